//! Configuration settings structures for jobkit
//!
//! Everything here can be loaded from TOML files and `JOBKIT_*`
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::error::ConfigError;
use crate::logger::{
    ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig, RotationStrategy, TimeUnit,
};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "jobkit".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/jobkit.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation_strategy() -> String {
    "size".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

fn empty_settings() -> JsonValue {
    JsonValue::Object(Default::default())
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Colors are only emitted when stdout is a terminal
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// Rotation settings for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// "size", "daily"/"time", "hourly", "weekly", "monthly" or "combined"
    #[serde(default = "default_rotation_strategy")]
    pub strategy: String,

    /// Maximum file size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of rotated files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    #[serde(default)]
    pub compress: bool,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            strategy: default_rotation_strategy(),
            max_size: default_max_size(),
            max_files: default_max_files(),
            compress: false,
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// "trace", "debug", "info", "warn" or "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime [`LoggerConfig`]
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;
        let rotation = self.rotation.into_rotation_config()?;

        FileConfig::new(
            self.enabled,
            PathBuf::from(self.path),
            self.append,
            format,
            rotation,
        )
        .map_err(|e| ConfigError::validation("logger.file", e.to_string()))
    }
}

impl RotationSettings {
    pub fn into_rotation_config(self) -> Result<RotationConfig, ConfigError> {
        let strategy = self.parse_strategy()?;

        RotationConfig::new(strategy, self.max_size, self.max_files, self.compress)
            .map_err(|e| ConfigError::validation("logger.file.rotation", e.to_string()))
    }

    pub(crate) fn parse_strategy(&self) -> Result<RotationStrategy, ConfigError> {
        match self.strategy.to_lowercase().as_str() {
            "size" => Ok(RotationStrategy::Size),
            "combined" => Ok(RotationStrategy::Combined),
            "time" | "daily" => Ok(RotationStrategy::Time(TimeUnit::Daily)),
            "hourly" => Ok(RotationStrategy::Time(TimeUnit::Hourly)),
            "weekly" => Ok(RotationStrategy::Time(TimeUnit::Weekly)),
            "monthly" => Ok(RotationStrategy::Time(TimeUnit::Monthly)),
            _ => Err(ConfigError::validation(
                "logger.file.rotation.strategy",
                format!(
                    "Invalid rotation strategy '{}'. Valid strategies are: size, time, daily, hourly, weekly, monthly, combined",
                    self.strategy
                ),
            )),
        }
    }
}

// ============================================================================
// Jobs Configuration
// ============================================================================

/// A named job instance: a registered job type plus its construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub job_type: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Passed verbatim to the job type's deserializer
    #[serde(default = "empty_settings")]
    pub settings: JsonValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Deadline in seconds for a single run from the CLI, 0 disables it
    #[serde(default)]
    pub default_timeout: u64,

    #[serde(default)]
    pub definitions: Vec<JobDefinition>,
}

impl JobsConfig {
    pub fn default_deadline(&self) -> Option<Duration> {
        (self.default_timeout > 0).then(|| Duration::from_secs(self.default_timeout))
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub jobs: JobsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_rotation_settings() -> impl Strategy<Value = RotationSettings> {
        (
            prop_oneof![
                Just("size".to_string()),
                Just("combined".to_string()),
                Just("daily".to_string()),
                Just("hourly".to_string()),
                Just("monthly".to_string()),
            ],
            1024u64..=100_000_000u64,
            1usize..=20usize,
            any::<bool>(),
        )
            .prop_map(|(strategy, max_size, max_files, compress)| RotationSettings {
                strategy,
                max_size,
                max_files,
                compress,
            })
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![
                Just("trace".to_string()),
                Just("info".to_string()),
                Just("error".to_string()),
            ],
            any::<bool>(),
            any::<bool>(),
            prop_oneof![
                Just("json".to_string()),
                Just("full".to_string()),
                Just("compact".to_string()),
            ],
            arb_rotation_settings(),
        )
            .prop_map(|(level, file_enabled, colored, format, rotation)| LoggerSettings {
                level,
                console: ConsoleSettings {
                    enabled: true,
                    colored,
                },
                file: FileSettings {
                    enabled: file_enabled,
                    path: "logs/test.log".to_string(),
                    append: true,
                    format,
                    rotation,
                },
            })
    }

    fn arb_job_definition() -> impl Strategy<Value = JobDefinition> {
        (
            "[a-z][a-z0-9-]{0,15}",
            prop_oneof![Just("noop".to_string()), Just("fail".to_string())],
            any::<bool>(),
            proptest::option::of("[A-Za-z ]{1,30}"),
            proptest::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 0..4),
        )
            .prop_map(|(name, job_type, enabled, description, settings)| JobDefinition {
                name,
                job_type,
                enabled,
                description,
                settings: serde_json::to_value(settings).unwrap(),
            })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_logger_settings(),
            0u64..=3600u64,
            proptest::collection::vec(arb_job_definition(), 0..4),
        )
            .prop_map(|(logger, default_timeout, definitions)| Settings {
                application: ApplicationConfig::default(),
                logger,
                jobs: JobsConfig {
                    default_timeout,
                    definitions,
                },
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Serializing settings to TOML and reading them back is lossless
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_application_config_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.name, "jobkit");
        assert_eq!(config.version, crate::pkg_version());
    }

    #[test]
    fn test_job_definition_defaults() {
        let definition: JobDefinition = toml::from_str(
            r#"
name = "warmup"
type = "noop"
"#,
        )
        .unwrap();

        assert!(definition.enabled);
        assert!(definition.description.is_none());
        assert_eq!(definition.settings, serde_json::json!({}));
    }

    #[test]
    fn test_job_definition_nested_settings() {
        let definition: JobDefinition = toml::from_str(
            r#"
name = "backup"
type = "command"

[settings]
program = "tar"
args = ["-czf", "backup.tgz", "data"]
"#,
        )
        .unwrap();

        assert_eq!(definition.settings["program"], "tar");
        assert_eq!(definition.settings["args"][1], "backup.tgz");
    }

    #[test]
    fn test_default_deadline() {
        let mut jobs = JobsConfig::default();
        assert!(jobs.default_deadline().is_none());

        jobs.default_timeout = 30;
        assert_eq!(jobs.default_deadline(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_logger_settings_conversion() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                format: "compact".to_string(),
                rotation: RotationSettings {
                    strategy: "hourly".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(
            config.file.rotation.strategy,
            RotationStrategy::Time(TimeUnit::Hourly)
        );
    }

    #[test]
    fn test_invalid_rotation_strategy() {
        let rotation = RotationSettings {
            strategy: "sometimes".to_string(),
            ..Default::default()
        };
        let err = rotation.into_rotation_config().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logger.file.rotation.strategy"));
    }
}
