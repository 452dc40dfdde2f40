use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schedulable unit of work.
///
/// The host decides when and how often `run` is called and on which thread.
/// `run` is blocking and may be invoked any number of times on the same
/// instance, so implementations that keep state across runs need interior
/// mutability.
///
/// The returned boolean is the only failure channel: `true` means the run
/// succeeded, `false` means it failed. A job must not panic to report
/// failure. [`JobExecutor`](crate::jobs::JobExecutor) contains a panic if one
/// escapes anyway and reports it as [`JobStatus::Panicked`].
pub trait SchedulerJob: Send + Sync + fmt::Debug {
    /// Run the job once.
    fn run(&self) -> bool;

    /// Ask an in-flight `run` to stop early and return `false`.
    ///
    /// Called from another thread when a deadline passes. Jobs that cannot
    /// be interrupted keep the default, which does nothing.
    fn cancel(&self) {}
}

impl<J: SchedulerJob + ?Sized> SchedulerJob for Box<J> {
    fn run(&self) -> bool {
        (**self).run()
    }

    fn cancel(&self) {
        (**self).cancel()
    }
}

impl<J: SchedulerJob + ?Sized> SchedulerJob for Arc<J> {
    fn run(&self) -> bool {
        (**self).run()
    }

    fn cancel(&self) {
        (**self).cancel()
    }
}

impl<J: SchedulerJob + ?Sized> SchedulerJob for &J {
    fn run(&self) -> bool {
        (**self).run()
    }

    fn cancel(&self) {
        (**self).cancel()
    }
}

/// Adapts a closure into a [`SchedulerJob`].
pub struct FnJob<F> {
    label: &'static str,
    f: F,
}

impl<F> FnJob<F>
where
    F: Fn() -> bool + Send + Sync,
{
    pub fn new(label: &'static str, f: F) -> Self {
        Self { label, f }
    }
}

impl<F> fmt::Debug for FnJob<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnJob").field("label", &self.label).finish()
    }
}

impl<F> SchedulerJob for FnJob<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn run(&self) -> bool {
        (self.f)()
    }
}

/// Result of a single guarded invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Succeeded,
    Failed,
    Panicked,
    TimedOut,
}

impl JobStatus {
    pub fn is_success(self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl From<bool> for JobStatus {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Panicked => write!(f, "panicked"),
            JobStatus::TimedOut => write!(f, "timedout"),
        }
    }
}

/// Record of one invocation of a job
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub invocation_id: Uuid,
    pub job_name: String,
    pub status: JobStatus,
    pub started_at: Timestamp,
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.status.is_success()
    }
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis().min(u64::MAX as u128) as u64)
}
