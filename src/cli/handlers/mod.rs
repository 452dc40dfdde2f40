//! Command handlers for CLI operations
//!
//! Each handler owns the loaded settings and a job registry, keeping
//! command execution separate from parsing and validation.

pub mod check;
pub mod list;
pub mod run;

pub use check::CheckCommandHandler;
pub use list::ListCommandHandler;
pub use run::{RunCommandHandler, RunTarget};
