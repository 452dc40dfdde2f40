//! Check command handler
//!
//! Builds every enabled job without running any of them, so a broken
//! definition shows up before a scheduler triggers it.

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::jobs::{JobError, JobRegistry};

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
    registry: JobRegistry,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self::with_registry(config, JobRegistry::with_builtin())
    }

    pub fn with_registry(config: Settings, registry: JobRegistry) -> Self {
        Self { config, registry }
    }

    /// Print one line per definition and return whether all of them built
    pub fn execute(&self) -> AppResult<bool> {
        self.config.validate()?;

        let problems = self.problems();
        for definition in &self.config.jobs.definitions {
            match problems.iter().find(|(name, _)| *name == definition.name) {
                Some((_, err)) => println!("FAIL {}: {}", definition.name, err),
                None if definition.enabled => println!("ok   {}", definition.name),
                None => println!("skip {} (disabled)", definition.name),
            }
        }

        if problems.is_empty() {
            println!(
                "Configuration is valid, {} job(s) defined",
                self.config.jobs.definitions.len()
            );
        }
        Ok(problems.is_empty())
    }

    /// Every enabled definition that fails to build, in configuration order
    pub fn problems(&self) -> Vec<(String, JobError)> {
        self.config
            .jobs
            .definitions
            .iter()
            .filter(|definition| definition.enabled)
            .filter_map(|definition| {
                self.registry
                    .create(&definition.job_type, definition.settings.clone())
                    .err()
                    .map(|err| {
                        tracing::warn!(job = %definition.name, error = %err, "Job definition does not build");
                        (definition.name.clone(), err)
                    })
            })
            .collect()
    }
}
