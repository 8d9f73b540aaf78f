//! Service registry.
//!
//! The registry is built once from configuration and never mutated, so it
//! can be shared between request handlers without locking.

use crate::config::{Config, ServiceSpec};
use crate::error::{ManagerError, Result};
use tracing::warn;

/// Read-only set of configured services, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<ServiceSpec>,
}

impl ServiceRegistry {
    /// Creates a registry from service specs.
    pub fn new(services: Vec<ServiceSpec>) -> Self {
        Self { services }
    }

    /// Creates a registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.services.clone())
    }

    /// Resolves an enabled service by exact name.
    ///
    /// Disabled services resolve exactly like unknown ones.
    pub fn resolve(&self, name: &str) -> Result<&ServiceSpec> {
        self.services
            .iter()
            .find(|spec| spec.enabled && spec.name == name)
            .ok_or_else(|| ManagerError::ServiceNotFound {
                service: name.to_string(),
            })
    }

    /// Returns every service, enabled or not.
    pub fn list(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// Returns only enabled services.
    pub fn enabled(&self) -> impl Iterator<Item = &ServiceSpec> {
        self.services.iter().filter(|spec| spec.enabled)
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Logs a warning for every missing project directory or compose file
    /// and returns how many were found. Never fails: such services stay
    /// registered and surface the problem when dispatched.
    pub fn check_paths(&self) -> usize {
        let mut problems = 0;

        for spec in &self.services {
            if !spec.project_path.is_dir() {
                warn!(
                    service = %spec.name,
                    project_path = %spec.project_path.display(),
                    "Project directory does not exist"
                );
                problems += 1;
                continue;
            }

            let compose_path = spec.compose_path();
            if !compose_path.is_file() {
                warn!(
                    service = %spec.name,
                    compose_file = %compose_path.display(),
                    "Compose file does not exist"
                );
                problems += 1;
            }
        }

        problems
    }
}
