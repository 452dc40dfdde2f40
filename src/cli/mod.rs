//! CLI module for jobkit
//!
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command handlers for run, list and check

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment};

use std::future::Future;

use crate::config::{ConfigError, ConfigLoader, Settings};
use crate::logger::{LoggerError, init_logger};

/// Load configuration and apply the global CLI overrides.
///
/// `--config` replaces the layered directory with a single file, `--env`
/// replaces `JOBKIT_APP_ENV` and `--verbose`/`--quiet` replace the
/// configured log level.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::from_file(path),
        None => ConfigLoader::new()?,
    };
    let loader = match cli.env {
        Some(env) => loader.with_environment(env.into()),
        None => loader,
    };

    let mut settings = loader.load()?;
    if let Some(level) = cli.level_override() {
        settings.logger.level = level.to_string();
    }
    Ok(settings)
}

/// Initialize the global logger from settings
pub fn init_logger_from_settings(settings: &Settings) -> Result<(), LoggerError> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .map_err(|e| LoggerError::config(e.to_string()))?;

    init_logger(logger_config)
}

/// Drive `future` to completion on a fresh multi-thread runtime.
///
/// The runtime is shut down without waiting for blocking tasks, so a job
/// that outlived its deadline and ignored cancellation does not keep the
/// process alive.
pub fn block_on_detached<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}
