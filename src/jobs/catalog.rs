use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::settings::JobDefinition;
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::registry::JobRegistry;
use crate::jobs::types::SchedulerJob;

/// Named job instances built from configuration.
///
/// Iteration order is the job name order.
#[derive(Debug, Default)]
pub struct JobCatalog {
    jobs: BTreeMap<String, Arc<dyn SchedulerJob>>,
}

impl JobCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every enabled definition through the registry
    pub fn build(registry: &JobRegistry, definitions: &[JobDefinition]) -> JobResult<Self> {
        let mut catalog = Self::new();

        for definition in definitions {
            if !definition.enabled {
                tracing::debug!(job = %definition.name, "Skipping disabled job");
                continue;
            }

            let job = registry.create(&definition.job_type, definition.settings.clone())?;
            catalog.insert(definition.name.clone(), Arc::from(job))?;
        }

        tracing::debug!(jobs = catalog.len(), "Job catalog built");
        Ok(catalog)
    }

    pub fn insert(&mut self, name: impl Into<String>, job: Arc<dyn SchedulerJob>) -> JobResult<()> {
        let name = name.into();
        if self.jobs.contains_key(&name) {
            return Err(JobError::DuplicateJob(name));
        }
        self.jobs.insert(name, job);
        Ok(())
    }

    pub fn get(&self, name: &str) -> JobResult<Arc<dyn SchedulerJob>> {
        self.jobs
            .get(name)
            .cloned()
            .ok_or_else(|| JobError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn SchedulerJob>)> {
        self.jobs.iter().map(|(name, job)| (name.as_str(), job))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(name: &str, job_type: &str, enabled: bool) -> JobDefinition {
        JobDefinition {
            name: name.to_string(),
            job_type: job_type.to_string(),
            enabled,
            description: None,
            settings: json!({}),
        }
    }

    #[test]
    fn test_build_skips_disabled() {
        let registry = JobRegistry::with_builtin();
        let definitions = vec![
            definition("warmup", "noop", true),
            definition("broken", "fail", false),
        ];

        let catalog = JobCatalog::build(&registry, &definitions).unwrap();
        assert_eq!(catalog.names(), vec!["warmup"]);
        assert!(catalog.get("warmup").unwrap().run());
        assert!(matches!(catalog.get("broken"), Err(JobError::NotFound(_))));
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let registry = JobRegistry::with_builtin();
        let definitions = vec![
            definition("same", "noop", true),
            definition("same", "fail", true),
        ];

        let err = JobCatalog::build(&registry, &definitions).unwrap_err();
        assert!(matches!(err, JobError::DuplicateJob(ref name) if name == "same"));
    }

    #[test]
    fn test_build_propagates_unknown_type() {
        let registry = JobRegistry::with_builtin();
        let definitions = vec![definition("mystery", "teleport", true)];

        let err = JobCatalog::build(&registry, &definitions).unwrap_err();
        assert!(matches!(err, JobError::UnknownJobType(_)));
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = JobRegistry::with_builtin();
        let definitions = vec![
            definition("zeta", "noop", true),
            definition("alpha", "noop", true),
            definition("mid", "fail", true),
        ];

        let catalog = JobCatalog::build(&registry, &definitions).unwrap();
        assert_eq!(catalog.names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }
}
