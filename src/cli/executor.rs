//! Command executor for dispatching CLI commands

use super::handlers::{CheckCommandHandler, ListCommandHandler, RunCommandHandler, RunTarget};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings.
///
/// Returns whether the command succeeded. A job that reports failure is not
/// an error, it turns into `Ok(false)` and a non-zero exit code.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<bool> {
    match &cli.command {
        Commands::Run {
            name,
            job_type,
            settings: job_settings,
            all,
            timeout,
            json,
        } => {
            let target = run_target(name.as_deref(), job_type.as_deref(), job_settings.clone(), *all)?;
            RunCommandHandler::new(settings)
                .execute(target, *timeout, *json)
                .await
        }
        Commands::List => {
            ListCommandHandler::new(settings).execute()?;
            Ok(true)
        }
        Commands::Check => CheckCommandHandler::new(settings).execute(),
    }
}

fn run_target(
    name: Option<&str>,
    job_type: Option<&str>,
    settings: Option<serde_json::Value>,
    all: bool,
) -> AppResult<RunTarget> {
    if settings.is_some() && job_type.is_none() {
        return Err(AppError::validation(
            "settings",
            "--settings only applies to ad-hoc jobs given with --type",
        ));
    }

    match (name, job_type, all) {
        (Some(name), None, false) => Ok(RunTarget::Named(name.to_string())),
        (None, Some(job_type), false) => Ok(RunTarget::AdHoc {
            job_type: job_type.to_string(),
            settings: settings.unwrap_or_else(|| serde_json::json!({})),
        }),
        (None, None, true) => Ok(RunTarget::All),
        _ => Err(AppError::validation(
            "run",
            "Specify exactly one of NAME, --type or --all",
        )),
    }
}
