//! Value parsers for CLI arguments
//!
//! Plugged into clap through `value_parser = ...` so bad input is reported
//! before any configuration is loaded.

use std::net::IpAddr;
use std::path::PathBuf;

/// Longest hostname allowed by RFC 1035
const MAX_HOSTNAME_LEN: usize = 253;

/// Parse a TCP port, rejecting 0
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    match port_str.trim().parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )),
    }
}

/// Check that a configuration file exists, is a regular file and is TOML
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    let metadata = std::fs::metadata(&path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))?;
    if !metadata.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(path),
        _ => Err(format!(
            "Configuration file must have a .toml extension: '{}'",
            path_str
        )),
    }
}

/// Accept IP literals and plausible hostnames
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // Dotted digits that failed to parse as an address are a typo, not a hostname
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "Host address is too long (maximum {} characters)",
            MAX_HOSTNAME_LEN
        ));
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(format!("Host address contains invalid characters: '{}'", host_str));
    }

    Ok(host.to_string())
}
