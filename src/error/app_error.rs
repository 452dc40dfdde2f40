use thiserror::Error;

use crate::config::ConfigError;
use crate::jobs::JobError;
use crate::logger::LoggerError;

/// Application-wide error type for the CLI surface.
///
/// Library modules return their own error enums; this type gathers them at
/// the command boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_is_transparent() {
        let err: AppError = JobError::NotFound("nightly".to_string()).into();
        assert_eq!(err.to_string(), "Job not found: nightly");
    }

    #[test]
    fn test_validation_message() {
        let err = AppError::validation("run", "either a job name or --type is required");
        assert_eq!(
            err.to_string(),
            "Validation failed for run: either a job name or --type is required"
        );
    }
}
