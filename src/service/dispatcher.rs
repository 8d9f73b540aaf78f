//! Action dispatcher.
//!
//! Resolves a service, validates the requested action, runs the matching
//! compose command and turns the outcome into an [`ActionResult`]. Every
//! failure is returned as data; nothing here returns `Err` to the caller.

use crate::config::ServiceSpec;
use crate::error::ManagerError;
use crate::service::action::{ActionResult, ComposeAction, ServiceAction};
use crate::service::command::ComposeCommand;
use crate::service::registry::ServiceRegistry;
use crate::service::runner::CommandRunner;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Dispatches actions against registered services.
pub struct ActionDispatcher {
    registry: Arc<ServiceRegistry>,
    runner: Arc<dyn CommandRunner>,
    compose: ComposeCommand,
}

impl ActionDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        registry: Arc<ServiceRegistry>,
        runner: Arc<dyn CommandRunner>,
        compose: ComposeCommand,
    ) -> Self {
        Self {
            registry,
            runner,
            compose,
        }
    }

    /// Dispatches `action` against `service`.
    ///
    /// The service is resolved before the action is looked at, and no
    /// process is spawned unless both are valid. A non-empty `target` is
    /// appended to every action except `ps`.
    pub async fn dispatch(&self, service: &str, action: &str, target: &str) -> ActionResult {
        let spec = match self.registry.resolve(service) {
            Ok(spec) => spec,
            Err(err) => {
                warn!(service = %service, action = %action, "Service not found or disabled");
                return ActionResult::failure(service, "Service not found", "", &err);
            }
        };

        let action = match action.parse::<ServiceAction>() {
            Ok(action) => action,
            Err(err) => {
                warn!(service = %service, action = %action, "Unknown action requested");
                return ActionResult::failure(service, "Unknown action", "", &err);
            }
        };

        match action {
            ServiceAction::Compose(compose_action) => {
                self.run_action(spec, compose_action, target).await
            }
            ServiceAction::Update => self.update(spec, target).await,
        }
    }

    /// Pulls, then brings the project up. A failed pull is returned as is.
    async fn update(&self, spec: &ServiceSpec, target: &str) -> ActionResult {
        info!(service = %spec.name, target = %target, "Updating service");

        let pulled = self.run_action(spec, ComposeAction::Pull, target).await;
        if !pulled.success {
            warn!(service = %spec.name, "Pull failed, skipping up");
            return pulled;
        }

        self.run_action(spec, ComposeAction::Up, target).await
    }

    /// Runs exactly one compose subcommand.
    async fn run_action(
        &self,
        spec: &ServiceSpec,
        action: ComposeAction,
        target: &str,
    ) -> ActionResult {
        let invocation = self.compose.invocation(spec, action.args(target));

        info!(
            service = %spec.name,
            action = %action,
            command = %invocation,
            "Running action"
        );

        match self.runner.run(&invocation).await {
            Ok(output) if output.success => {
                info!(service = %spec.name, action = %action, "Action completed");
                ActionResult::success(
                    &spec.name,
                    format!("Action '{}' completed for service '{}'", action, spec.name),
                    output.combined(),
                )
            }
            Ok(output) => {
                let err =
                    ManagerError::command_failed(invocation.to_string(), output.exit_description());
                error!(
                    service = %spec.name,
                    action = %action,
                    code = %err.code(),
                    error = %err,
                    "Action failed"
                );
                ActionResult::failure(
                    &spec.name,
                    format!("Action '{}' failed for service '{}'", action, spec.name),
                    output.combined(),
                    &err,
                )
            }
            Err(err) => {
                error!(
                    service = %spec.name,
                    action = %action,
                    code = %err.code(),
                    error = %err,
                    "Action could not be started"
                );
                ActionResult::failure(
                    &spec.name,
                    format!("Action '{}' failed for service '{}'", action, spec.name),
                    "",
                    &err,
                )
            }
        }
    }
}
