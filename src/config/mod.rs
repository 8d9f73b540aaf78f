//! Configuration module for container-manager.
//!
//! Configuration is loaded once at startup from a YAML file, optionally
//! overridden by environment variables, validated, and then treated as
//! immutable for the lifetime of the process.

mod logging;
mod service;

pub use logging::{LogFormat, LogLevel};
pub use service::{ServiceSpec, DEFAULT_COMPOSE_FILE};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

use crate::error::{ManagerError, Result};
use crate::service::ComposeCommand;

/// Default configuration file path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable for configuration file path.
pub const ENV_CONFIG_PATH: &str = "CONTAINER_MANAGER_CONFIG";

/// Environment variable overriding `bind_address`.
pub const ENV_BIND_ADDRESS: &str = "CONTAINER_MANAGER_BIND_ADDRESS";

/// Environment variable overriding `port`.
pub const ENV_PORT: &str = "CONTAINER_MANAGER_PORT";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address.
    pub bind_address: String,

    /// Listen port. Accepts either an integer or a numeric string.
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Orchestration program and leading arguments, e.g. `docker compose`.
    pub compose_command: String,

    /// Upper bound on a single HTTP request, in seconds.
    pub request_timeout_seconds: u64,

    /// Reject unparseable POST bodies instead of treating them as an action name.
    pub strict_requests: bool,

    /// Managed services, in registry order.
    pub services: Vec<ServiceSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8090,
            compose_command: "docker compose".to_string(),
            request_timeout_seconds: 300,
            strict_requests: false,
            services: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file, applies environment overrides
    /// and validates the result. A missing file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ManagerError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ManagerError::config_with_source(
                format!("Failed to read config file: {}", path.display()),
                e,
            )
        })?;

        let mut config = Self::parse(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML string without environment overrides.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ManagerError::config_with_source("Failed to parse config", e))
    }

    /// Applies environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup. Empty values are ignored.
    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_BIND_ADDRESS).filter(|v| !v.is_empty()) {
            self.bind_address = addr;
        }

        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.port = port.trim().parse().map_err(|_| {
                ManagerError::config(format!("{} is not a valid port: {}", ENV_PORT, port))
            })?;
        }

        Ok(())
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ManagerError::config("port must be between 1 and 65535"));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ManagerError::config("bind_address must not be empty"));
        }

        ComposeCommand::parse(&self.compose_command)?;

        if self.request_timeout_seconds == 0 {
            return Err(ManagerError::config(
                "request_timeout_seconds must be at least 1",
            ));
        }

        let mut seen = HashSet::new();
        for (index, service) in self.services.iter().enumerate() {
            service.validate(index)?;
            if !seen.insert(service.name.as_str()) {
                return Err(ManagerError::config(format!(
                    "services: duplicate service name '{}'",
                    service.name
                )));
            }
        }

        Ok(())
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {}", text))),
    }
}
