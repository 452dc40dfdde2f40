use serde::{Deserialize, Serialize};

use crate::jobs::registry::RegisteredJob;
use crate::jobs::types::SchedulerJob;

fn default_reason() -> String {
    "configured to fail".to_string()
}

/// Always fails. Exercises a host's handling of a `false` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FailJob {
    #[serde(default = "default_reason")]
    pub reason: String,
}

impl Default for FailJob {
    fn default() -> Self {
        Self {
            reason: default_reason(),
        }
    }
}

impl SchedulerJob for FailJob {
    fn run(&self) -> bool {
        tracing::info!(reason = %self.reason, "fail job ran");
        false
    }
}

impl RegisteredJob for FailJob {
    const JOB_TYPE: &'static str = "fail";

    fn summary() -> &'static str {
        "Always fails, logging the configured reason"
    }
}
