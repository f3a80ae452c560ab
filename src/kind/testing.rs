/// Scripted runner standing in for the kind executable in tests
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::runner::CommandRunner;
use crate::error::{KindError, Result};
use crate::utils::command::CommandOutput;

enum Reply {
    Exit { success: bool, stdout: String },
    SpawnError,
}

/// Replays queued replies in order and records every invocation
#[derive(Default)]
pub struct FakeRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(self, stdout: &str) -> Self {
        self.push(Reply::Exit {
            success: true,
            stdout: stdout.to_string(),
        })
    }

    pub fn fail(self, stdout: &str) -> Self {
        self.push(Reply::Exit {
            success: false,
            stdout: stdout.to_string(),
        })
    }

    pub fn spawn_error(self) -> Self {
        self.push(Reply::SpawnError)
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, Result<CommandOutput>> {
        self.calls.lock().unwrap().push(args.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();

        let result = match reply {
            Some(Reply::Exit { success, stdout }) => Ok(CommandOutput {
                stdout: stdout.into_bytes(),
                stderr: String::new(),
                success,
            }),
            Some(Reply::SpawnError) => Err(KindError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "kind: command not found",
            ))),
            None => panic!("unexpected invocation: {:?}", args),
        };
        async move { result }.boxed()
    }
}
