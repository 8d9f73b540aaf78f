//! External process execution.
//!
//! Every child process the agent spawns goes through the [`CommandRunner`]
//! trait, so the dispatcher and prober can be exercised against a recording
//! runner in tests.

use crate::error::{ManagerError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A fully-built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory of the child.
    pub working_dir: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        write!(f, "{}", shell_words::join(words))
    }
}

/// Captured result of a child process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates a zero-exit output.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Creates a non-zero-exit output.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) if self.stdout.ends_with('\n') => {
                format!("{}{}", self.stdout, self.stderr)
            }
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }

    /// Describes the exit status, e.g. `exit status 1`.
    pub fn exit_description(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Spawns external commands and waits for them to finish.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion and captures all of its output.
    ///
    /// A child that starts and exits non-zero is reported as `Ok` with
    /// `success == false`. `Err` means the child could not be started.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
///
/// No timeout is applied to the child; the caller awaits it until exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    /// Creates a new runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!(
            command = %invocation,
            working_dir = %invocation.working_dir.display(),
            "Executing command"
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ManagerError::command_failed_with_source(invocation.to_string(), e))?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            command = %invocation,
            exit_code = result.exit_code,
            stdout = %result.stdout,
            stderr = %result.stderr,
            "Command completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, working_dir: impl Into<PathBuf>) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: working_dir.into(),
        }
    }

    #[test]
    fn test_invocation_display_quotes_arguments() {
        let invocation = Invocation {
            program: "docker".to_string(),
            args: vec!["compose".into(), "-f".into(), "my compose.yml".into(), "ps".into()],
            working_dir: PathBuf::from("/srv/api"),
        };

        assert_eq!(
            invocation.to_string(),
            "docker compose -f 'my compose.yml' ps"
        );
    }

    #[test]
    fn test_combined_output() {
        let out = CommandOutput {
            stdout: "pulled".to_string(),
            stderr: "warning".to_string(),
            ..Default::default()
        };
        assert_eq!(out.combined(), "pulled\nwarning");

        let out = CommandOutput {
            stdout: "pulled\n".to_string(),
            stderr: "warning\n".to_string(),
            ..Default::default()
        };
        assert_eq!(out.combined(), "pulled\nwarning\n");

        assert_eq!(CommandOutput::failure(1, "boom").combined(), "boom");
        assert_eq!(CommandOutput::success("ok").combined(), "ok");
    }

    #[test]
    fn test_exit_description() {
        assert_eq!(CommandOutput::failure(2, "").exit_description(), "exit status 2");
        let signalled = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert_eq!(signalled.exit_description(), "terminated by signal");
    }

    #[tokio::test]
    async fn test_run_captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TokioCommandRunner::new();

        let output = runner
            .run(&sh("echo out; echo err >&2", dir.path()))
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_run_uses_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let runner = TokioCommandRunner::new();

        let output = runner.run(&sh("cat marker.txt", dir.path())).await.unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "here");
    }

    #[tokio::test]
    async fn test_run_non_zero_exit_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TokioCommandRunner::new();

        let output = runner
            .run(&sh("echo failing >&2; exit 3", dir.path()))
            .await
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.combined(), "failing\n");
    }

    #[tokio::test]
    async fn test_run_missing_program_is_err() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TokioCommandRunner::new();
        let invocation = Invocation {
            program: "container-manager-no-such-binary".to_string(),
            args: vec![],
            working_dir: dir.path().to_path_buf(),
        };

        let err = runner.run(&invocation).await.unwrap_err();
        assert!(matches!(err, ManagerError::CommandExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn test_run_missing_working_dir_is_err() {
        let runner = TokioCommandRunner::new();

        let result = runner
            .run(&sh("true", "/nonexistent/container-manager/project"))
            .await;

        assert!(result.is_err());
    }
}
