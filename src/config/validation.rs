//! Configuration validation logic
//!
//! Checks that loaded values are within acceptable ranges before anything
//! is built from them. Job types are not checked here; the registry decides
//! whether a type exists when the catalog is built.

use std::collections::HashSet;

use crate::config::error::ConfigError;
use crate::config::settings::{FileSettings, JobDefinition, JobsConfig, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Upper bound for `jobs.default_timeout`, one day
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        self.rotation.parse_strategy()?;

        if self.rotation.max_size == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_size",
                "Max file size must be greater than 0 bytes.",
            ));
        }

        if self.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_files",
                "Max files must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl JobDefinition {
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let field = |name: &str| format!("jobs.definitions[{}].{}", index, name);

        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(field("name"), "Job name must not be empty."));
        }

        if self.name.chars().any(char::is_whitespace) {
            return Err(ConfigError::validation(
                field("name"),
                format!("Job name '{}' must not contain whitespace.", self.name),
            ));
        }

        if self.job_type.trim().is_empty() {
            return Err(ConfigError::validation(field("type"), "Job type must not be empty."));
        }

        if !self.settings.is_object() {
            return Err(ConfigError::validation(
                field("settings"),
                "Job settings must be a table.",
            ));
        }

        Ok(())
    }
}

impl JobsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::validation(
                "jobs.default_timeout",
                format!(
                    "Default timeout ({}s) cannot exceed {}s.",
                    self.default_timeout, MAX_TIMEOUT_SECONDS
                ),
            ));
        }

        let mut seen = HashSet::new();
        for (index, definition) in self.definitions.iter().enumerate() {
            definition.validate(index)?;

            if !seen.insert(definition.name.as_str()) {
                return Err(ConfigError::validation(
                    format!("jobs.definitions[{}].name", index),
                    format!("Job name '{}' is defined more than once.", definition.name),
                ));
            }
        }

        Ok(())
    }
}

impl Settings {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application.name.trim().is_empty() {
            return Err(ConfigError::validation(
                "application.name",
                "Application name must not be empty.",
            ));
        }

        self.logger.validate()?;
        self.jobs.validate()?;
        Ok(())
    }
}
