use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Unknown job type: {0}")]
    UnknownJobType(String),

    #[error("Invalid settings for job type '{job_type}': {message}")]
    InvalidSettings { job_type: String, message: String },

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job already exists: {0}")]
    DuplicateJob(String),

    #[error("Job invocation could not be joined: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl JobError {
    pub fn invalid_settings(job_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            job_type: job_type.into(),
            message: message.into(),
        }
    }
}

pub type JobResult<T> = Result<T, JobError>;
