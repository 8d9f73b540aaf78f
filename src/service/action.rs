//! Actions and their results.

use crate::error::ManagerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of log lines returned by the `logs` action.
pub const LOGS_TAIL_LINES: usize = 50;

/// A single compose subcommand. Each one maps to exactly one child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// Pull images.
    Pull,
    /// Create and start containers, detached.
    Up,
    /// Stop and remove containers.
    Down,
    /// Restart containers.
    Restart,
    /// Stop containers.
    Stop,
    /// Show recent logs.
    Logs,
    /// List containers.
    Ps,
}

impl ComposeAction {
    /// Returns the action name as accepted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeAction::Pull => "pull",
            ComposeAction::Up => "up",
            ComposeAction::Down => "down",
            ComposeAction::Restart => "restart",
            ComposeAction::Stop => "stop",
            ComposeAction::Logs => "logs",
            ComposeAction::Ps => "ps",
        }
    }

    /// Whether a non-empty target is appended to the arguments.
    pub fn accepts_target(&self) -> bool {
        !matches!(self, ComposeAction::Ps)
    }

    /// Builds the subcommand arguments, including the target when accepted.
    pub fn args(&self, target: &str) -> Vec<String> {
        let mut args = match self {
            ComposeAction::Up => vec!["up".to_string(), "-d".to_string()],
            ComposeAction::Logs => vec![
                "logs".to_string(),
                "--tail".to_string(),
                LOGS_TAIL_LINES.to_string(),
            ],
            other => vec![other.as_str().to_string()],
        };

        if self.accepts_target() && !target.is_empty() {
            args.push(target.to_string());
        }

        args
    }
}

impl fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any action a client may request.
///
/// `Update` is a composite of two [`ComposeAction`]s and is not itself a
/// compose subcommand, so it cannot be nested inside another composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    /// A single compose subcommand.
    Compose(ComposeAction),
    /// `pull`, then `up` if the pull succeeded.
    Update,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceAction::Compose(action) => fmt::Display::fmt(action, f),
            ServiceAction::Update => f.write_str("update"),
        }
    }
}

impl FromStr for ServiceAction {
    type Err = ManagerError;

    /// Parses an action name. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "pull" => ServiceAction::Compose(ComposeAction::Pull),
            "up" => ServiceAction::Compose(ComposeAction::Up),
            "down" => ServiceAction::Compose(ComposeAction::Down),
            "restart" => ServiceAction::Compose(ComposeAction::Restart),
            "stop" => ServiceAction::Compose(ComposeAction::Stop),
            "logs" => ServiceAction::Compose(ComposeAction::Logs),
            "ps" => ServiceAction::Compose(ComposeAction::Ps),
            "update" => ServiceAction::Update,
            _ => {
                return Err(ManagerError::UnknownAction {
                    action: s.to_string(),
                })
            }
        };
        Ok(action)
    }
}

/// Outcome of a dispatch.
///
/// `success == false` always comes with a non-empty `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Captured command output, on success and on failure.
    #[serde(default)]
    pub output: String,
    /// Failure description; empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Requested service name, echoed back.
    pub service: String,
}

impl ActionResult {
    /// Creates a successful result.
    pub fn success(
        service: impl Into<String>,
        message: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            output: output.into(),
            error: String::new(),
            service: service.into(),
        }
    }

    /// Creates a failed result from the underlying error.
    pub fn failure(
        service: impl Into<String>,
        message: impl Into<String>,
        output: impl Into<String>,
        error: &ManagerError,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            output: output.into(),
            error: error.to_string(),
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(
            "pull".parse::<ServiceAction>().unwrap(),
            ServiceAction::Compose(ComposeAction::Pull)
        );
        assert_eq!(
            "ps".parse::<ServiceAction>().unwrap(),
            ServiceAction::Compose(ComposeAction::Ps)
        );
        assert_eq!(
            "update".parse::<ServiceAction>().unwrap(),
            ServiceAction::Update
        );
    }

    #[test]
    fn test_action_parse_is_case_sensitive() {
        let err = "Restart".parse::<ServiceAction>().unwrap_err();
        assert!(matches!(err, ManagerError::UnknownAction { ref action } if action == "Restart"));
        assert!("".parse::<ServiceAction>().is_err());
        assert!("start".parse::<ServiceAction>().is_err());
    }

    #[test]
    fn test_action_display_matches_parse() {
        for name in ["pull", "up", "down", "restart", "stop", "logs", "ps", "update"] {
            let action: ServiceAction = name.parse().unwrap();
            assert_eq!(action.to_string(), name);
        }
    }

    #[test]
    fn test_compose_args() {
        assert_eq!(ComposeAction::Pull.args(""), vec!["pull"]);
        assert_eq!(ComposeAction::Pull.args("web"), vec!["pull", "web"]);
        assert_eq!(ComposeAction::Up.args("web"), vec!["up", "-d", "web"]);
        assert_eq!(ComposeAction::Down.args(""), vec!["down"]);
        assert_eq!(ComposeAction::Logs.args("db"), vec!["logs", "--tail", "50", "db"]);
    }

    #[test]
    fn test_ps_ignores_target() {
        assert!(!ComposeAction::Ps.accepts_target());
        assert_eq!(ComposeAction::Ps.args("web"), vec!["ps"]);
    }

    #[test]
    fn test_action_result_invariant() {
        let ok = ActionResult::success("api", "done", "output");
        assert!(ok.success);
        assert!(ok.error.is_empty());

        let err = ManagerError::ServiceNotFound {
            service: "api".to_string(),
        };
        let failed = ActionResult::failure("api", "Service not found", "", &err);
        assert!(!failed.success);
        assert!(!failed.error.is_empty());
    }

    #[test]
    fn test_action_result_serialization() {
        let ok = ActionResult::success("api", "done", "");
        let json = serde_json::to_value(&ok).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["output"], "");
        assert_eq!(json["service"], "api");
        assert!(json.get("error").is_none());

        let err = ManagerError::UnknownAction {
            action: "explode".to_string(),
        };
        let failed = ActionResult::failure("api", "Unknown action", "", &err);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "Unknown action: explode");
    }
}
