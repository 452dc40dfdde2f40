use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use jiff::Timestamp;
use uuid::Uuid;

use crate::jobs::catalog::JobCatalog;
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::types::{JobOutcome, JobStatus, SchedulerJob};

/// How long a timed-out job gets to return after being cancelled
pub const CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Invokes jobs once and records the outcome.
///
/// The executor never retries and never decides when a job runs. It only
/// guarantees that a job's result, including a panic escaping `run`, ends up
/// in a [`JobOutcome`] instead of unwinding into the caller.
#[derive(Debug, Clone, Default)]
pub struct JobExecutor {
    default_deadline: Option<Duration>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline applied by [`invoke_blocking`](Self::invoke_blocking) when the
    /// caller passes none
    pub fn with_default_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.default_deadline = deadline;
        self
    }

    pub fn default_deadline(&self) -> Option<Duration> {
        self.default_deadline
    }

    /// Run `job` once on the current thread
    pub fn invoke(&self, name: &str, job: &dyn SchedulerJob) -> JobOutcome {
        invoke_guarded(Uuid::new_v4(), name, job)
    }

    /// Run `job` once on the blocking thread pool.
    ///
    /// If the deadline passes first the outcome is [`JobStatus::TimedOut`].
    /// The job is then asked to [`cancel`](SchedulerJob::cancel) and given
    /// [`CANCEL_GRACE`] to return, so the next job does not start while it
    /// is still running. A job that ignores cancellation keeps running
    /// detached; the runtime owner decides whether to wait for it.
    pub async fn invoke_blocking(
        &self,
        name: &str,
        job: Arc<dyn SchedulerJob>,
        deadline: Option<Duration>,
    ) -> JobResult<JobOutcome> {
        let invocation_id = Uuid::new_v4();
        let started_at = Timestamp::now();
        let start = Instant::now();

        let running = Arc::clone(&job);
        let job_name = name.to_string();
        let mut handle = tokio::task::spawn_blocking(move || {
            invoke_guarded(invocation_id, &job_name, running.as_ref())
        });

        let joined = match deadline.or(self.default_deadline) {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    job.cancel();
                    let stopped = tokio::time::timeout(CANCEL_GRACE, handle).await.is_ok();
                    let deadline_ms = limit.as_millis() as u64;

                    let message = if stopped {
                        tracing::error!(job = %name, %invocation_id, deadline_ms, "Job exceeded its deadline and was cancelled");
                        format!("exceeded deadline of {}ms, cancelled", deadline_ms)
                    } else {
                        tracing::error!(
                            job = %name,
                            %invocation_id,
                            deadline_ms,
                            "Job exceeded its deadline and ignored cancellation, leaving it running detached"
                        );
                        format!("exceeded deadline of {}ms, still running", deadline_ms)
                    };

                    return Ok(JobOutcome {
                        invocation_id,
                        job_name: name.to_string(),
                        status: JobStatus::TimedOut,
                        started_at,
                        duration: start.elapsed(),
                        message: Some(message),
                    });
                }
            },
            None => handle.await,
        };

        match joined {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_panic() => Ok(JobOutcome {
                invocation_id,
                job_name: name.to_string(),
                status: JobStatus::Panicked,
                started_at,
                duration: start.elapsed(),
                message: Some(panic_message(e.into_panic().as_ref())),
            }),
            Err(e) => Err(JobError::from(e)),
        }
    }

    /// Run every catalog job once, in name order, on the current thread
    pub fn invoke_all(&self, catalog: &JobCatalog) -> Vec<JobOutcome> {
        catalog
            .iter()
            .map(|(name, job)| self.invoke(name, job.as_ref()))
            .collect()
    }
}

fn invoke_guarded(invocation_id: Uuid, name: &str, job: &dyn SchedulerJob) -> JobOutcome {
    let span = tracing::info_span!("job_invocation", job = %name, %invocation_id);
    let _enter = span.enter();

    let started_at = Timestamp::now();
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| job.run()));
    let duration = start.elapsed();
    let duration_ms = duration.as_millis() as u64;

    let (status, message) = match result {
        Ok(true) => {
            tracing::info!(duration_ms, "Job succeeded");
            (JobStatus::Succeeded, None)
        }
        Ok(false) => {
            tracing::warn!(duration_ms, "Job reported failure");
            (JobStatus::Failed, None)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(duration_ms, panic = %message, "Job panicked");
            (JobStatus::Panicked, Some(message))
        }
    };

    JobOutcome {
        invocation_id,
        job_name: name.to_string(),
        status,
        started_at,
        duration,
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "job panicked with a non-string payload".to_string()
    }
}
