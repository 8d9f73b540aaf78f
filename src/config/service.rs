//! Service definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ManagerError, Result};

/// Compose file name used when a service does not name one.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

fn default_compose_file() -> String {
    DEFAULT_COMPOSE_FILE.to_string()
}

/// Identity and location of one manageable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Unique registry key. Lookups are case-sensitive.
    pub name: String,

    /// Working directory for every command run against this service.
    pub project_path: PathBuf,

    /// Compose file, relative to `project_path`.
    #[serde(default = "default_compose_file")]
    pub compose_file: String,

    /// Disabled services cannot be dispatched to.
    #[serde(default)]
    pub enabled: bool,
}

impl ServiceSpec {
    /// Creates an enabled service using the default compose file.
    pub fn new(name: impl Into<String>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            project_path: project_path.into(),
            compose_file: default_compose_file(),
            enabled: true,
        }
    }

    /// Returns the full path of the compose file.
    pub fn compose_path(&self) -> PathBuf {
        self.project_path.join(&self.compose_file)
    }

    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ManagerError::config(format!(
                "services[{}].name is required",
                index
            )));
        }
        if self.project_path.as_os_str().is_empty() {
            return Err(ManagerError::config(format!(
                "services.{}.project_path is required",
                self.name
            )));
        }
        if self.compose_file.trim().is_empty() {
            return Err(ManagerError::config(format!(
                "services.{}.compose_file must not be empty",
                self.name
            )));
        }
        Ok(())
    }
}
