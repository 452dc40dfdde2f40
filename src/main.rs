use std::process::ExitCode;

use clap::Parser;
use jobkit::cli::{
    Cli, block_on_detached, execute_command, init_logger_from_settings, load_settings,
};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        application = %settings.application.name,
        version = %settings.application.version,
        "Configuration loaded"
    );

    let succeeded = block_on_detached(execute_command(&cli, settings))??;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
