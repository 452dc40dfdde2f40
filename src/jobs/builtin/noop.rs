use serde::{Deserialize, Serialize};

use crate::jobs::registry::RegisteredJob;
use crate::jobs::types::SchedulerJob;

/// Does nothing and always succeeds. Useful for checking the wiring of a host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoopJob {}

impl SchedulerJob for NoopJob {
    fn run(&self) -> bool {
        tracing::debug!("noop job ran");
        true
    }
}

impl RegisteredJob for NoopJob {
    const JOB_TYPE: &'static str = "noop";

    fn summary() -> &'static str {
        "Does nothing and always succeeds"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_always_succeeds() {
        let job = NoopJob::default();
        assert!((0..10).all(|_| job.run()));
    }

    #[test]
    fn test_noop_rejects_unknown_settings() {
        let result: Result<NoopJob, _> = serde_json::from_value(serde_json::json!({ "x": 1 }));
        assert!(result.is_err());
    }
}
