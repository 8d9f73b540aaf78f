//! Status prober.
//!
//! A coarse classifier: it only looks at whether the compose project reports
//! any containers, not at the health of individual containers.

use crate::config::ServiceSpec;
use crate::service::command::ComposeCommand;
use crate::service::runner::CommandRunner;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Point-in-time state of a service's containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// The project reports at least one container.
    Running,
    /// The project reports no containers.
    Stopped,
    /// The status command could not be run or failed.
    Error,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Running => write!(f, "running"),
            ServiceStatus::Stopped => write!(f, "stopped"),
            ServiceStatus::Error => write!(f, "error"),
        }
    }
}

/// Runs `ps --format json` for a service and classifies the result.
pub struct StatusProber {
    runner: Arc<dyn CommandRunner>,
    compose: ComposeCommand,
}

impl StatusProber {
    /// Creates a prober.
    pub fn new(runner: Arc<dyn CommandRunner>, compose: ComposeCommand) -> Self {
        Self { runner, compose }
    }

    /// Probes the current status of a service. Never mutates anything.
    pub async fn probe(&self, spec: &ServiceSpec) -> ServiceStatus {
        let args = ["ps", "--format", "json"].map(String::from);
        let invocation = self.compose.invocation(spec, args);

        let status = match self.runner.run(&invocation).await {
            Ok(output) if output.success => classify(&output.stdout),
            Ok(output) => {
                warn!(
                    service = %spec.name,
                    exit = %output.exit_description(),
                    stderr = %output.stderr.trim(),
                    "Status command failed"
                );
                ServiceStatus::Error
            }
            Err(err) => {
                warn!(service = %spec.name, error = %err, "Status command could not be run");
                ServiceStatus::Error
            }
        };

        debug!(service = %spec.name, status = %status, "Probed service");
        status
    }
}

/// Classifies `ps --format json` output.
///
/// Compose prints either a JSON array or one JSON object per line depending
/// on its version; an empty array, `null` or no output at all means stopped.
pub(crate) fn classify(stdout: &str) -> ServiceStatus {
    match stdout.trim() {
        "" | "[]" | "null" => ServiceStatus::Stopped,
        _ => ServiceStatus::Running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::runner::CommandOutput;
    use crate::service::test_support::RecordingRunner;

    fn prober_with(runner: &Arc<RecordingRunner>) -> StatusProber {
        StatusProber::new(runner.clone(), ComposeCommand::default())
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), ServiceStatus::Stopped);
        assert_eq!(classify("  \n"), ServiceStatus::Stopped);
        assert_eq!(classify("[]\n"), ServiceStatus::Stopped);
        assert_eq!(classify("null"), ServiceStatus::Stopped);
        assert_eq!(
            classify(r#"[{"Name":"api-web-1","State":"running"}]"#),
            ServiceStatus::Running
        );
        assert_eq!(
            classify("{\"Name\":\"api-web-1\"}\n{\"Name\":\"api-db-1\"}\n"),
            ServiceStatus::Running
        );
    }

    #[test]
    fn test_status_display_and_serialization() {
        assert_eq!(ServiceStatus::Running.to_string(), "running");
        assert_eq!(ServiceStatus::Stopped.to_string(), "stopped");
        assert_eq!(
            serde_json::to_string(&ServiceStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[tokio::test]
    async fn test_probe_builds_ps_command() {
        let runner = Arc::new(RecordingRunner::succeeding("[]"));
        let prober = prober_with(&runner);
        let spec = ServiceSpec::new("api", "/srv/api");

        prober.probe(&spec).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec!["compose", "-f", "docker-compose.yml", "ps", "--format", "json"]
        );
        assert_eq!(calls[0].working_dir, spec.project_path);
    }

    #[tokio::test]
    async fn test_probe_running() {
        let runner = Arc::new(RecordingRunner::succeeding(r#"[{"Name":"api-web-1"}]"#));
        let prober = prober_with(&runner);

        let status = prober.probe(&ServiceSpec::new("api", "/srv/api")).await;
        assert_eq!(status, ServiceStatus::Running);
    }

    #[tokio::test]
    async fn test_probe_ignores_stderr_warnings() {
        let runner = Arc::new(RecordingRunner::succeeding(""));
        runner.push_output(CommandOutput {
            stderr: "the attribute `version` is obsolete".to_string(),
            ..CommandOutput::success("[]")
        });
        let prober = prober_with(&runner);

        let status = prober.probe(&ServiceSpec::new("api", "/srv/api")).await;
        assert_eq!(status, ServiceStatus::Stopped);
    }

    #[tokio::test]
    async fn test_probe_non_zero_exit_is_error() {
        let runner = Arc::new(RecordingRunner::succeeding(""));
        runner.push_output(CommandOutput::failure(1, "no configuration file provided"));
        let prober = prober_with(&runner);

        let status = prober.probe(&ServiceSpec::new("api", "/srv/api")).await;
        assert_eq!(status, ServiceStatus::Error);
    }

    #[tokio::test]
    async fn test_probe_spawn_failure_is_error() {
        let runner = Arc::new(RecordingRunner::succeeding(""));
        runner.push_spawn_error("No such file or directory");
        let prober = prober_with(&runner);

        let status = prober.probe(&ServiceSpec::new("api", "/srv/api")).await;
        assert_eq!(status, ServiceStatus::Error);
    }

    #[tokio::test]
    async fn test_probe_stopped_is_stable_across_calls() {
        let runner = Arc::new(RecordingRunner::succeeding("[]"));
        let prober = prober_with(&runner);
        let spec = ServiceSpec::new("api", "/srv/api");

        for _ in 0..3 {
            assert_eq!(prober.probe(&spec).await, ServiceStatus::Stopped);
        }
        assert_eq!(runner.spawn_count(), 3);
    }
}
