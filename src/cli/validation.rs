//! CLI argument validation functions
//!
//! Checks that go beyond what clap can validate on its own.

use std::fs;
use std::path::PathBuf;

use serde_json::Value as JsonValue;

use crate::config::validation::MAX_TIMEOUT_SECONDS;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Validate a run deadline in seconds
pub fn validate_timeout(timeout_str: &str) -> Result<u64, String> {
    let timeout: u64 = timeout_str.parse().map_err(|_| {
        format!(
            "Timeout must be a whole number of seconds, got: '{}'",
            timeout_str
        )
    })?;

    if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
        return Err(format!(
            "Timeout must be between 1 and {} seconds",
            MAX_TIMEOUT_SECONDS
        ));
    }

    Ok(timeout)
}

/// Validate ad-hoc job settings, which must be a JSON object
pub fn validate_settings_json(settings_str: &str) -> Result<JsonValue, String> {
    let value: JsonValue = serde_json::from_str(settings_str)
        .map_err(|e| format!("Settings must be valid JSON: {}", e))?;

    if !value.is_object() {
        return Err("Settings must be a JSON object, e.g. '{\"program\": \"true\"}'".to_string());
    }

    Ok(value)
}
