use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::jobs::registry::RegisteredJob;
use crate::jobs::types::SchedulerJob;

/// How often a running child is checked for exit or cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs an external program and succeeds when it exits with status zero.
///
/// The child inherits stdout and stderr, so its output reaches the same place
/// as jobkit's own. Spawn errors are logged and reported as a failed run;
/// they never escape as errors or panics. [`SchedulerJob::cancel`] kills the
/// child.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandJob {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(skip)]
    cancelled: Arc<AtomicBool>,
}

impl CommandJob {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            cancelled: Arc::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Wait for the child, killing it once cancellation is requested.
    /// `Ok(None)` means the child was killed.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if self.cancelled.load(Ordering::SeqCst) {
                child.kill()?;
                child.wait()?;
                return Ok(None);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl SchedulerJob for CommandJob {
    fn run(&self) -> bool {
        let mut child = match self.command().spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %self.program, error = %e, "Failed to spawn command");
                return false;
            }
        };

        let waited = self.wait(&mut child);
        self.cancelled.store(false, Ordering::SeqCst);

        match waited {
            Ok(Some(status)) if status.success() => {
                tracing::debug!(program = %self.program, "Command exited successfully");
                true
            }
            Ok(Some(status)) => {
                tracing::warn!(program = %self.program, %status, "Command exited with failure");
                false
            }
            Ok(None) => {
                tracing::warn!(program = %self.program, pid = child.id(), "Command killed on cancellation");
                false
            }
            Err(e) => {
                tracing::error!(program = %self.program, error = %e, "Failed to wait for command");
                let _ = child.kill();
                false
            }
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl RegisteredJob for CommandJob {
    const JOB_TYPE: &'static str = "command";

    fn summary() -> &'static str {
        "Runs an external program; succeeds on exit status 0"
    }

    fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("program must not be empty".to_string());
        }
        if let Some(dir) = &self.working_dir {
            if dir.as_os_str().is_empty() {
                return Err("working_dir must not be empty when set".to_string());
            }
        }
        Ok(())
    }
}
