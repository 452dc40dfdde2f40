use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::jobs::builtin::{CommandJob, FailJob, NoopJob};
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::types::SchedulerJob;

/// A job type that can be built by name from its settings
pub trait RegisteredJob: SchedulerJob + DeserializeOwned + 'static {
    /// Unique identifier for this job type
    const JOB_TYPE: &'static str;

    /// One-line summary shown by `jobkit list`
    fn summary() -> &'static str {
        ""
    }

    /// Checks settings that deserialized but are still unusable
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

type JobFactory = Box<dyn Fn(JsonValue) -> JobResult<Box<dyn SchedulerJob>> + Send + Sync>;

struct Entry {
    summary: &'static str,
    factory: JobFactory,
}

/// Registry for mapping job types to job implementations
pub struct JobRegistry {
    entries: HashMap<String, Entry>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry preloaded with `noop`, `fail` and `command`
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register::<NoopJob>()
            .register::<FailJob>()
            .register::<CommandJob>();
        registry
    }

    /// Register a job type with the registry
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: RegisteredJob,
    {
        let factory: JobFactory = Box::new(|settings: JsonValue| {
            let settings = match settings {
                JsonValue::Null => JsonValue::Object(Default::default()),
                other => other,
            };
            let job: T = serde_json::from_value(settings)
                .map_err(|e| JobError::invalid_settings(T::JOB_TYPE, e.to_string()))?;
            job.validate()
                .map_err(|message| JobError::invalid_settings(T::JOB_TYPE, message))?;
            Ok(Box::new(job) as Box<dyn SchedulerJob>)
        });

        let previous = self.entries.insert(
            T::JOB_TYPE.to_string(),
            Entry {
                summary: T::summary(),
                factory,
            },
        );
        if previous.is_some() {
            tracing::warn!(job_type = T::JOB_TYPE, "Job type registered twice, replacing factory");
        }
        self
    }

    /// Create a job instance from job type and settings
    pub fn create(&self, job_type: &str, settings: JsonValue) -> JobResult<Box<dyn SchedulerJob>> {
        let entry = self
            .entries
            .get(job_type)
            .ok_or_else(|| JobError::UnknownJobType(job_type.to_string()))?;

        (entry.factory)(settings)
    }

    pub fn contains(&self, job_type: &str) -> bool {
        self.entries.contains_key(job_type)
    }

    /// Registered job type names, sorted
    pub fn job_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn summary(&self, job_type: &str) -> Option<&'static str> {
        self.entries.get(job_type).map(|entry| entry.summary)
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct ThresholdJob {
        threshold: u32,
    }

    impl SchedulerJob for ThresholdJob {
        fn run(&self) -> bool {
            self.threshold > 10
        }
    }

    impl RegisteredJob for ThresholdJob {
        const JOB_TYPE: &'static str = "threshold";

        fn validate(&self) -> Result<(), String> {
            if self.threshold == 0 {
                return Err("threshold must be greater than 0".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_builtin_types_registered() {
        let registry = JobRegistry::with_builtin();
        assert_eq!(registry.job_types(), vec!["command", "fail", "noop"]);
        assert!(registry.summary("noop").is_some());
    }

    #[test]
    fn test_create_passes_settings_to_job() {
        let mut registry = JobRegistry::new();
        registry.register::<ThresholdJob>();

        let high = registry.create("threshold", json!({ "threshold": 42 })).unwrap();
        let low = registry.create("threshold", json!({ "threshold": 3 })).unwrap();
        assert!(high.run());
        assert!(!low.run());
    }

    #[test]
    fn test_unknown_type() {
        let registry = JobRegistry::with_builtin();
        let err = registry.create("missing", json!({})).unwrap_err();
        assert!(matches!(err, JobError::UnknownJobType(ref t) if t == "missing"));
    }

    #[test]
    fn test_settings_that_do_not_deserialize() {
        let mut registry = JobRegistry::new();
        registry.register::<ThresholdJob>();

        let err = registry
            .create("threshold", json!({ "threshold": "many" }))
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidSettings { ref job_type, .. } if job_type == "threshold"));
    }

    #[test]
    fn test_settings_rejected_by_validate() {
        let mut registry = JobRegistry::new();
        registry.register::<ThresholdJob>();

        let err = registry
            .create("threshold", json!({ "threshold": 0 }))
            .unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_null_settings_treated_as_empty() {
        let registry = JobRegistry::with_builtin();
        let job = registry.create("noop", JsonValue::Null).unwrap();
        assert!(job.run());
    }

    #[test]
    fn test_register_twice_replaces() {
        let mut registry = JobRegistry::new();
        registry.register::<NoopJob>().register::<NoopJob>();
        assert_eq!(registry.job_types(), vec!["noop"]);
    }
}
