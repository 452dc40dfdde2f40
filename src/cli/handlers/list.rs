//! List command handler

use std::fmt::Write;

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::jobs::JobRegistry;

/// Handler for the list command
pub struct ListCommandHandler {
    config: Settings,
    registry: JobRegistry,
}

impl ListCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self::with_registry(config, JobRegistry::with_builtin())
    }

    pub fn with_registry(config: Settings, registry: JobRegistry) -> Self {
        Self { config, registry }
    }

    pub fn execute(&self) -> AppResult<()> {
        print!("{}", self.render());
        Ok(())
    }

    /// Registered job types followed by the configured jobs
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Job types:");
        for job_type in self.registry.job_types() {
            let summary = self.registry.summary(job_type).unwrap_or_default();
            let _ = writeln!(out, "  {:<12} {}", job_type, summary);
        }

        let _ = writeln!(out);
        let definitions = &self.config.jobs.definitions;
        if definitions.is_empty() {
            let _ = writeln!(out, "No jobs configured");
            return out;
        }

        let _ = writeln!(out, "Configured jobs:");
        let mut sorted: Vec<_> = definitions.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        for definition in sorted {
            let state = if definition.enabled { "" } else { " [disabled]" };
            let _ = write!(out, "  {} ({}){}", definition.name, definition.job_type, state);
            if let Some(description) = &definition.description {
                let _ = write!(out, ": {}", description);
            }
            let _ = writeln!(out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobDefinition;
    use serde_json::json;

    #[test]
    fn test_render_lists_builtin_types() {
        let output = ListCommandHandler::new(Settings::default()).render();

        assert!(output.starts_with("Job types:\n"));
        for job_type in ["command", "fail", "noop"] {
            assert!(output.contains(&format!("  {:<12}", job_type)), "missing {}", job_type);
        }
        assert!(output.ends_with("No jobs configured\n"));
    }

    #[test]
    fn test_render_lists_configured_jobs_by_name() {
        let mut settings = Settings::default();
        settings.jobs.definitions = vec![
            JobDefinition {
                name: "zeta".to_string(),
                job_type: "noop".to_string(),
                enabled: false,
                description: None,
                settings: json!({}),
            },
            JobDefinition {
                name: "alpha".to_string(),
                job_type: "command".to_string(),
                enabled: true,
                description: Some("Nightly archive".to_string()),
                settings: json!({ "program": "tar" }),
            },
        ];

        let output = ListCommandHandler::new(settings).render();

        let alpha = output.find("  alpha (command): Nightly archive\n").unwrap();
        let zeta = output.find("  zeta (noop) [disabled]\n").unwrap();
        assert!(alpha < zeta);
    }
}
