//! Run command handler
//!
//! Builds the requested jobs and invokes each of them exactly once.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::jobs::{JobCatalog, JobError, JobExecutor, JobOutcome, JobRegistry, SchedulerJob};

/// What `jobkit run` was asked to run
#[derive(Debug, Clone, PartialEq)]
pub enum RunTarget {
    /// A job from `jobs.definitions`
    Named(String),
    /// A job built from a registered type and inline settings
    AdHoc { job_type: String, settings: JsonValue },
    /// Every enabled job from `jobs.definitions`
    All,
}

/// Handler for the run command
pub struct RunCommandHandler {
    config: Settings,
    registry: JobRegistry,
}

impl RunCommandHandler {
    /// Create a handler backed by the built-in job types
    pub fn new(config: Settings) -> Self {
        Self::with_registry(config, JobRegistry::with_builtin())
    }

    pub fn with_registry(config: Settings, registry: JobRegistry) -> Self {
        Self { config, registry }
    }

    /// Run the target and print one line per outcome.
    ///
    /// Returns `Ok(true)` only when every invoked job succeeded. Job failures
    /// are reported through the return value, errors are reserved for jobs
    /// that could not be built.
    pub async fn execute(&self, target: RunTarget, timeout: Option<u64>, json: bool) -> AppResult<bool> {
        let outcomes = self.run(target, timeout).await?;

        for outcome in &outcomes {
            report(outcome, json)?;
        }

        Ok(outcomes.iter().all(JobOutcome::succeeded))
    }

    /// Run the target and collect the outcomes in invocation order
    pub async fn run(&self, target: RunTarget, timeout: Option<u64>) -> AppResult<Vec<JobOutcome>> {
        let executor = JobExecutor::new().with_default_deadline(self.config.jobs.default_deadline());
        let deadline = timeout.map(Duration::from_secs);

        match target {
            RunTarget::Named(name) => {
                let job = self.build_named(&name)?;
                let outcome = executor.invoke_blocking(&name, job, deadline).await?;
                Ok(vec![outcome])
            }
            RunTarget::AdHoc { job_type, settings } => {
                let job: Arc<dyn SchedulerJob> = Arc::from(self.registry.create(&job_type, settings)?);
                let outcome = executor.invoke_blocking(&job_type, job, deadline).await?;
                Ok(vec![outcome])
            }
            RunTarget::All => {
                let catalog = JobCatalog::build(&self.registry, &self.config.jobs.definitions)?;
                if catalog.is_empty() {
                    tracing::warn!("No enabled jobs configured, nothing to run");
                }

                let mut outcomes = Vec::with_capacity(catalog.len());
                for (name, job) in catalog.iter() {
                    outcomes.push(executor.invoke_blocking(name, Arc::clone(job), deadline).await?);
                }
                Ok(outcomes)
            }
        }
    }

    fn build_named(&self, name: &str) -> AppResult<Arc<dyn SchedulerJob>> {
        let definition = self
            .config
            .jobs
            .definitions
            .iter()
            .find(|definition| definition.name == name)
            .ok_or_else(|| JobError::NotFound(name.to_string()))?;

        if !definition.enabled {
            return Err(AppError::validation(
                "job",
                format!("Job '{}' is disabled in configuration", name),
            ));
        }

        let job = self
            .registry
            .create(&definition.job_type, definition.settings.clone())?;
        Ok(Arc::from(job))
    }
}

fn report(outcome: &JobOutcome, json: bool) -> AppResult<()> {
    if json {
        let line = serde_json::to_string(outcome).map_err(anyhow::Error::from)?;
        println!("{}", line);
        return Ok(());
    }

    let elapsed_ms = outcome.duration.as_millis();
    match &outcome.message {
        Some(message) => println!(
            "{}: {} in {}ms ({})",
            outcome.job_name, outcome.status, elapsed_ms, message
        ),
        None => println!("{}: {} in {}ms", outcome.job_name, outcome.status, elapsed_ms),
    }
    Ok(())
}
