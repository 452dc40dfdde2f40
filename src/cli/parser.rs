//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as JsonValue;

/// Run pluggable jobs once, on demand
#[derive(Parser, Debug)]
#[command(name = "jobkit")]
#[command(about = "Run pluggable jobs once, on demand")]
#[command(long_about = "
jobkit builds jobs from configuration and runs each one exactly once per
invocation. It does not schedule anything itself: point cron, a systemd timer
or any other scheduler at `jobkit run <NAME>` and use the exit code.

EXAMPLES:
    # Run a configured job
    jobkit run nightly-backup

    # Run every enabled configured job, in name order
    jobkit run --all

    # Run an ad-hoc job of a registered type
    jobkit run --type command --settings '{\"program\": \"true\"}'

    # Give a job at most 60 seconds and print the outcome as JSON
    jobkit run nightly-backup --timeout 60 --json

    # Show job types and configured jobs
    jobkit list

    # Validate configuration without running anything
    jobkit --env production check
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// `JOBKIT_*` environment variables still apply on top of it.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job once
    ///
    /// Exits with status 0 when every job run succeeded and 1 otherwise.
    Run {
        /// Name of a configured job
        #[arg(
            value_name = "NAME",
            required_unless_present_any = ["job_type", "all"],
            conflicts_with_all = ["job_type", "all"]
        )]
        name: Option<String>,

        /// Run an ad-hoc job of this registered type
        #[arg(long = "type", value_name = "TYPE", conflicts_with = "all")]
        job_type: Option<String>,

        /// JSON settings for the ad-hoc job
        #[arg(
            long,
            value_name = "JSON",
            requires = "job_type",
            conflicts_with_all = ["name", "all"],
            value_parser = super::validation::validate_settings_json
        )]
        settings: Option<JsonValue>,

        /// Run every enabled configured job
        #[arg(long)]
        all: bool,

        /// Deadline in seconds, overrides `jobs.default_timeout`
        #[arg(long, value_name = "SECS", value_parser = super::validation::validate_timeout)]
        timeout: Option<u64>,

        /// Print outcomes as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// List registered job types and configured jobs
    List,

    /// Validate configuration and build every configured job without running it
    Check,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    Test,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl Cli {
    /// Log level forced by `--verbose` or `--quiet`
    pub fn level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
