//! Service module - registry, dispatch and status probing.
//!
//! This module provides the service management layer: the read-only
//! registry, the action dispatcher, the status prober, and the command
//! runner they all share.

pub mod action;
pub mod command;
pub mod dispatcher;
pub mod prober;
pub mod registry;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::{Config, ServiceSpec};
use crate::error::Result;
use std::sync::Arc;

// Re-exports for convenience
pub use action::{ActionResult, ComposeAction, ServiceAction};
pub use command::ComposeCommand;
pub use dispatcher::ActionDispatcher;
pub use prober::{ServiceStatus, StatusProber};
pub use registry::ServiceRegistry;
pub use runner::{CommandOutput, CommandRunner, Invocation, TokioCommandRunner};

/// Wires the registry, dispatcher and prober together from configuration.
pub struct ServiceManager {
    registry: Arc<ServiceRegistry>,
    dispatcher: ActionDispatcher,
    prober: StatusProber,
}

impl ServiceManager {
    /// Creates a manager that spawns real processes.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_runner(config, Arc::new(TokioCommandRunner::new()))
    }

    /// Creates a manager using the given command runner.
    pub fn with_runner(config: &Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let compose = ComposeCommand::parse(&config.compose_command)?;
        let registry = Arc::new(ServiceRegistry::from_config(config));

        Ok(Self {
            dispatcher: ActionDispatcher::new(registry.clone(), runner.clone(), compose.clone()),
            prober: StatusProber::new(runner, compose),
            registry,
        })
    }

    /// Returns the service registry.
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Dispatches an action. See [`ActionDispatcher::dispatch`].
    pub async fn dispatch(&self, service: &str, action: &str, target: &str) -> ActionResult {
        self.dispatcher.dispatch(service, action, target).await
    }

    /// Probes a service. See [`StatusProber::probe`].
    pub async fn probe(&self, spec: &ServiceSpec) -> ServiceStatus {
        self.prober.probe(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::RecordingRunner;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.services.push(ServiceSpec::new("api", "/srv/api"));
        config
    }

    #[test]
    fn test_from_config() {
        let manager = ServiceManager::from_config(&create_test_config()).unwrap();
        assert_eq!(manager.registry().len(), 1);
    }

    #[test]
    fn test_from_config_invalid_compose_command() {
        let mut config = create_test_config();
        config.compose_command = String::new();

        assert!(ServiceManager::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_custom_compose_command_is_used() {
        let mut config = create_test_config();
        config.compose_command = "podman-compose --verbose".to_string();
        let runner = Arc::new(RecordingRunner::succeeding(""));
        let manager = ServiceManager::with_runner(&config, runner.clone()).unwrap();

        let result = manager.dispatch("api", "down", "").await;
        assert!(result.success);

        let calls = runner.calls();
        assert_eq!(calls[0].program, "podman-compose");
        assert_eq!(
            calls[0].args,
            vec!["--verbose", "-f", "docker-compose.yml", "down"]
        );
    }

    #[tokio::test]
    async fn test_manager_operations() {
        let runner = Arc::new(RecordingRunner::succeeding("[]"));
        let manager = ServiceManager::with_runner(&create_test_config(), runner.clone()).unwrap();

        let spec = manager.registry().resolve("api").unwrap().clone();
        assert_eq!(manager.probe(&spec).await, ServiceStatus::Stopped);

        let result = manager.dispatch("api", "ps", "").await;
        assert!(result.success);
        assert_eq!(result.output, "[]");
        assert_eq!(runner.spawn_count(), 2);
    }
}
