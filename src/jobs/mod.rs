pub mod builtin;
pub mod catalog;
pub mod error;
pub mod executor;
pub mod registry;
pub mod types;

pub use catalog::JobCatalog;
pub use error::{JobError, JobResult};
pub use executor::JobExecutor;
pub use registry::{JobRegistry, RegisteredJob};
pub use types::{FnJob, JobOutcome, JobStatus, SchedulerJob};
