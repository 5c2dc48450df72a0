// src/exec/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{error, info, warn};

use super::backend::Action;

/// Runs a shell command line (`sh -c`, or `cmd /C` on Windows).
///
/// The child inherits stdin/stdout/stderr so test output shows up directly.
/// Dropping the run future (e.g. on Ctrl-C) kills the child.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    cmd: String,
}

impl ShellCommand {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn command_line(&self) -> &str {
        &self.cmd
    }

    fn build(&self) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }

    /// Spawn the command and wait for it to exit.
    pub async fn run_to_completion(&self) -> Result<ExitStatus> {
        info!(cmd = %self.cmd, "running command");

        let mut child = self
            .build()
            .spawn()
            .with_context(|| format!("spawning `{}`", self.cmd))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for `{}`", self.cmd))
    }
}

impl Action for ShellCommand {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            match self.run_to_completion().await {
                Ok(status) if status.success() => {
                    info!(cmd = %self.cmd, "command succeeded");
                }
                Ok(status) => {
                    warn!(
                        cmd = %self.cmd,
                        exit_code = status.code().unwrap_or(-1),
                        "command failed"
                    );
                }
                Err(err) => {
                    error!(cmd = %self.cmd, error = %err, "command could not be run");
                }
            }
        })
    }
}
