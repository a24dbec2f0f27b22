//! Configuration loader for pager-rs
//!
//! Handles loading configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "PAGER_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "PAGER_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Prefix for configuration overrides, e.g. `PAGER_SERVER__PORT`
const ENV_PREFIX: &str = "PAGER";

/// Separator for nested keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Layered configuration loader
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional)
/// 4. `PAGER_*` environment variables
///
/// A single explicit file replaces steps 1-3.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `PAGER_CONFIG_DIR`, `PAGER_CONFIG_FILE` and `PAGER_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both `PAGER_CONFIG_DIR` and `PAGER_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let file_var = std::env::var(CONFIG_FILE_ENV).ok();

        if dir_var.is_some() && file_var.is_some() {
            return Err(ConfigError::MutualExclusivityError(format!(
                "{} and {} cannot both be set. Use {} for layered configuration or {} for a single file.",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV, CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        Ok(Self {
            config_dir: dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file: file_var.map(PathBuf::from),
            environment: AppEnvironment::from_env(),
        })
    }

    /// Create a loader that reads only `path` (plus environment overrides).
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Create a layered loader rooted at `dir` for the given environment.
    pub fn from_dir(dir: impl Into<PathBuf>, environment: AppEnvironment) -> Self {
        Self {
            config_dir: dir.into(),
            config_file: None,
            environment,
        }
    }

    /// Replace the environment picked up from `PAGER_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load, deserialize and validate settings from every source.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match &self.config_file {
            Some(file) => Self::add_file_source(Config::builder(), file, true)?,
            None => self.build_layered_config(Config::builder())?,
        };

        // PAGER_SERVER__PORT -> server.port
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Self::add_file_source(builder, &self.config_dir.join("default.toml"), true)?;
        let env_file = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_file, false)?;
        Self::add_file_source(builder, &self.config_dir.join("local.toml"), false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment must not interleave
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[pagination]
default_limit = 20
max_limit = 100
"#;

    #[test]
    fn test_new_defaults() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_new_mutual_exclusivity() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let temp_dir = setup_config_dir(&[]);
        let loader = ConfigLoader::from_dir(temp_dir.path(), AppEnvironment::Development);

        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_layers_in_priority_order() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", "[server]\nport = 8080\n\n[pagination]\nmax_limit = 50\n"),
            ("local.toml", "[pagination]\nmax_limit = 40\n"),
        ]);
        let loader = ConfigLoader::from_dir(temp_dir.path(), AppEnvironment::Production);

        let settings = loader.load().expect("Should load layered config");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.pagination.max_limit, 40);
        assert_eq!(settings.pagination.default_limit, 20);
    }

    #[test]
    fn test_load_env_override() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set("PAGER_SERVER__PORT", "9090");
        env.set("PAGER_PAGINATION__DEFAULT_LIMIT", "15");

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        let loader = ConfigLoader::from_dir(temp_dir.path(), AppEnvironment::Development);

        let settings = loader.load().expect("Should load config");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.pagination.default_limit, 15);
    }

    #[test]
    fn test_load_single_file() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let temp_dir = setup_config_dir(&[("custom.toml", "[catalog]\nseed_items = 3\n")]);
        let loader = ConfigLoader::from_file(temp_dir.path().join("custom.toml"));

        let settings = loader.load().expect("Should load single file");
        assert_eq!(settings.catalog.seed_items, 3);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_load_rejects_invalid_pagination() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let temp_dir = setup_config_dir(&[(
            "default.toml",
            "[pagination]\nmin_limit = 50\nmax_limit = 10\n",
        )]);
        let loader = ConfigLoader::from_dir(temp_dir.path(), AppEnvironment::Development);

        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { ref field, .. }) if field == "pagination"
        ));
    }
}
