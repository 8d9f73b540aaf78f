//! Application state management.
//!
//! This module holds the state shared across HTTP request handlers. None of
//! it is written after startup.

use crate::config::Config;
use crate::error::Result;
use crate::service::{CommandRunner, ServiceManager};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
pub struct AppState {
    /// Registry, dispatcher and prober.
    pub manager: ServiceManager,
    /// Reject unparseable POST bodies instead of falling back.
    pub strict_requests: bool,
    /// Upper bound on a single HTTP request.
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new application state from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::build(config, ServiceManager::from_config(config)?))
    }

    /// Creates application state with a custom command runner.
    pub fn with_runner(config: &Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        Ok(Self::build(
            config,
            ServiceManager::with_runner(config, runner)?,
        ))
    }

    fn build(config: &Config, manager: ServiceManager) -> Self {
        Self {
            manager,
            strict_requests: config.strict_requests,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }
}
