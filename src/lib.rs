//! jobkit library
//!
//! A minimal contract for schedulable jobs plus the pieces around it: a
//! registry of job types, a catalog built from configuration, a guarded
//! invoker and a one-shot CLI.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod logger;

pub use jobs::{JobOutcome, JobStatus, SchedulerJob};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
