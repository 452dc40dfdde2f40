//! Job types shipped with jobkit.

mod command;
mod fail;
mod noop;

pub use command::CommandJob;
pub use fail::FailJob;
pub use noop::NoopJob;
