//! Recording command runner for tests.

use crate::error::{ManagerError, Result};
use crate::service::runner::{CommandOutput, CommandRunner, Invocation};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Scripted {
    Output(CommandOutput),
    SpawnError(String),
}

/// Records every invocation instead of spawning it.
///
/// Scripted responses are consumed in order; once they run out, every call
/// returns the fallback output.
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    scripted: Mutex<VecDeque<Scripted>>,
    fallback: CommandOutput,
}

impl RecordingRunner {
    /// Runner whose unscripted calls succeed with `stdout`.
    pub(crate) fn succeeding(stdout: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            fallback: CommandOutput::success(stdout),
        }
    }

    /// Queues an output for the next call.
    pub(crate) fn push_output(&self, output: CommandOutput) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Scripted::Output(output));
    }

    /// Queues a spawn failure for the next call.
    pub(crate) fn push_spawn_error(&self, reason: &str) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Scripted::SpawnError(reason.to_string()));
    }

    /// Returns all recorded invocations.
    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of processes that would have been spawned.
    pub(crate) fn spawn_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let next = self.scripted.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError(reason)) => Err(ManagerError::command_failed(
                invocation.to_string(),
                reason,
            )),
            None => Ok(self.fallback.clone()),
        }
    }
}
