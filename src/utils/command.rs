/// Command execution with captured output, timeout and cancellation
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;

use futures::future;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{KindError, Result};

/// Result from command execution with captured output
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutput {
    fn from_output(output: std::process::Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }
}

/// Builder for executing external commands
pub struct CommandBuilder {
    command: Command,
    shown: String,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CommandBuilder {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        let shown = program.as_ref().to_string_lossy().to_string();
        let mut command = Command::new(program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Self {
            command,
            shown,
            timeout: None,
            cancel: None,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.shown.push(' ');
        self.shown.push_str(&arg.as_ref().to_string_lossy());
        self.command.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Kill the child and fail if it runs longer than `timeout`
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kill the child and fail once `token` is cancelled
    pub fn cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Execute and return the captured output, whatever the exit status
    pub async fn output(self) -> Result<CommandOutput> {
        let CommandBuilder {
            mut command,
            shown,
            timeout,
            cancel,
        } = self;

        debug!("Running {}", shown);

        let child = command.spawn()?;

        let deadline = async move {
            match timeout {
                Some(after) => {
                    tokio::time::sleep(after).await;
                    after
                }
                None => future::pending::<Duration>().await,
            }
        };
        let cancelled = async move {
            match cancel {
                Some(token) => token.cancelled().await,
                None => future::pending::<()>().await,
            }
        };

        // Dropping the wait future drops the child, which kills it.
        tokio::select! {
            output = child.wait_with_output() => Ok(CommandOutput::from_output(output?)),
            after = deadline => Err(KindError::Timeout { command: shown, after }),
            _ = cancelled => Err(KindError::Cancelled { command: shown }),
        }
    }
}
