//! API request and response types.
//!
//! Control requests are answered with [`ActionResult`](crate::service::ActionResult)
//! directly; the types here cover listing, health and request parsing.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::ServiceSpec;
use crate::error::{ManagerError, Result};
use crate::service::ServiceStatus;

/// Service name used when a request does not name one.
pub const DEFAULT_SERVICE: &str = "default";

/// Action used when a request does not name one.
pub const DEFAULT_ACTION: &str = "update";

/// Overall health of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every enabled service could be probed.
    Healthy,
    /// At least one enabled service probe reported `error`.
    Degraded,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Aggregate status.
    pub status: HealthStatus,
    /// Unix timestamp, in seconds.
    pub timestamp: i64,
    /// Enabled services and their probed status.
    pub services: Vec<ServiceInfo>,
}

impl HealthResponse {
    /// Builds a health response stamped with the current time.
    pub fn new(services: Vec<ServiceInfo>) -> Self {
        let status = if services.iter().any(|s| s.status == ServiceStatus::Error) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            timestamp: Utc::now().timestamp(),
            services,
        }
    }
}

/// Service list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesResponse {
    /// Every registered service.
    pub services: Vec<ServiceInfo>,
}

/// One service with its probed status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// Project directory.
    pub project_path: String,
    /// Compose file name.
    pub compose_file: String,
    /// Whether the service accepts actions.
    pub enabled: bool,
    /// Probed status.
    pub status: ServiceStatus,
}

impl ServiceInfo {
    /// Combines a spec with its probed status.
    pub fn new(spec: &ServiceSpec, status: ServiceStatus) -> Self {
        Self {
            name: spec.name.clone(),
            project_path: spec.project_path.display().to_string(),
            compose_file: spec.compose_file.clone(),
            enabled: spec.enabled,
            status,
        }
    }
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

fn default_action() -> String {
    DEFAULT_ACTION.to_string()
}

/// Service control request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Target service name.
    #[serde(default = "default_service")]
    pub service: String,
    /// Action to perform.
    #[serde(default = "default_action")]
    pub action: String,
    /// Optional sub-selector appended to the command.
    #[serde(default)]
    pub target: String,
}

impl ServiceRequest {
    /// Parses a JSON POST body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ManagerError::malformed(e.to_string()))
    }

    /// Parses a JSON POST body, treating anything unparseable as the bare
    /// name of an action against the default service.
    pub fn from_body_lenient(body: &[u8]) -> Self {
        Self::from_json(body).unwrap_or_else(|_| Self {
            service: default_service(),
            action: String::from_utf8_lossy(body).trim().to_string(),
            target: String::new(),
        })
    }
}

/// Query parameters of `GET /service`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceQuery {
    /// Target service name.
    pub service: Option<String>,
    /// Action to perform.
    pub action: Option<String>,
    /// Optional sub-selector.
    pub target: Option<String>,
}

impl ServiceQuery {
    /// Builds the query from decoded key/value pairs. When a key repeats,
    /// the first value wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "service" => &mut query.service,
                "action" => &mut query.action,
                "target" => &mut query.target,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl From<ServiceQuery> for ServiceRequest {
    /// Missing or empty `service` and `action` fall back to their defaults.
    fn from(query: ServiceQuery) -> Self {
        Self {
            service: query
                .service
                .filter(|s| !s.is_empty())
                .unwrap_or_else(default_service),
            action: query
                .action
                .filter(|a| !a.is_empty())
                .unwrap_or_else(default_action),
            target: query.target.unwrap_or_default(),
        }
    }
}

/// Body returned for unsupported methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodNotAllowedResponse {
    /// Always `false`.
    pub success: bool,
    /// Explanation.
    pub error: String,
}

impl Default for MethodNotAllowedResponse {
    fn default() -> Self {
        Self {
            success: false,
            error: "Only GET and POST methods allowed".to_string(),
        }
    }
}
