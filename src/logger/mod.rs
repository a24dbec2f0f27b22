//! Logger Module
//!
//! Built on `tracing-subscriber`:
//! - Console output with color control
//! - File output in Full, Compact or JSON format

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    // RUST_LOG wins over the configured level when present
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter)?,
        (true, false) => init_console_only(&config.console, filter)?,
        (false, true) => init_file_only(&config.file, filter)?,
        (false, false) => anyhow::bail!("At least one output (console or file) must be enabled"),
    }

    Ok(())
}

fn console_ansi(config: &ConsoleConfig) -> bool {
    config.colored && std::io::stdout().is_terminal()
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(console_ansi(config))
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| LoggerError::subscriber(e.to_string()))?;
    Ok(())
}

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> anyhow::Result<()> {
    let writer = LogFileWriter::new(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .try_init(),
    };

    result.map_err(|e| LoggerError::subscriber(e.to_string()))?;
    Ok(())
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> anyhow::Result<()> {
    let writer = LogFileWriter::new(&config.file)?;
    let use_ansi = console_ansi(&config.console);

    // File layer goes first so console ANSI settings do not leak into span
    // fields written to the file (tokio-rs/tracing#1817).
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.file.format {
        LogFormat::Full => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            registry.with(file_layer).with(console_layer).try_init()
        }
        LogFormat::Compact => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(writer);
            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            registry.with(file_layer).with(console_layer).try_init()
        }
        LogFormat::Json => {
            let file_layer = fmt::layer().with_ansi(false).json().with_writer(writer);
            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            registry.with(file_layer).with(console_layer).try_init()
        }
    };

    result.map_err(|e| LoggerError::subscriber(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_invalid_config_before_installing() {
        let config = LoggerConfig {
            level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(init_logger(config).is_err());
    }

    #[test]
    fn test_init_both_opens_file_for_every_format() {
        let dir = tempfile::TempDir::new().unwrap();

        for format in [LogFormat::Full, LogFormat::Compact, LogFormat::Json] {
            let mut config = LoggerConfig::default();
            config.file.enabled = true;
            config.file.format = format;
            config.file.path = dir.path().join(format!("{:?}.log", format).to_lowercase());

            // Only the first call can install the global subscriber
            let _ = init_both(&config, EnvFilter::new("info"));
            assert!(config.file.path.exists(), "{:?} log file missing", format);
        }
    }

    #[test]
    fn test_init_rejects_no_outputs() {
        let mut config = LoggerConfig::default();
        config.console.enabled = false;
        assert!(init_logger(config).is_err());
    }
}
