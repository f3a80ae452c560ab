/// Process execution capability used by the kind client
use std::path::PathBuf;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::utils::command::{CommandBuilder, CommandOutput};

/// Runs the external cluster tool with the given arguments.
///
/// Implementations report a non-zero exit through `CommandOutput::success`
/// and reserve `Err` for failures to start or to finish the process.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, Result<CommandOutput>>;
}

/// Runner that spawns the real executable
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, Result<CommandOutput>> {
        CommandBuilder::new(&self.program)
            .args(args)
            .timeout(self.timeout)
            .cancellation(self.cancel.clone())
            .output()
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KindError;

    #[tokio::test]
    async fn test_process_runner_passes_arguments() {
        let runner = ProcessRunner::new("echo");
        let args = vec!["get".to_string(), "clusters".to_string()];

        let output = runner.run(&args).await.unwrap();
        assert!(output.success);
        assert_eq!(output.stdout_lossy(), "get clusters\n");
    }

    #[tokio::test]
    async fn test_process_runner_applies_timeout() {
        let runner = ProcessRunner::new("sleep").with_timeout(Some(Duration::from_millis(50)));
        let args = vec!["5".to_string()];

        let err = runner.run(&args).await.unwrap_err();
        assert!(matches!(err, KindError::Timeout { .. }));
    }
}
