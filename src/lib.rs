//! container-manager - HTTP control plane for docker compose projects
//!
//! This crate exposes a small HTTP API for listing, probing and driving a
//! fixed set of compose projects declared in a YAML file.
//!
//! # Overview
//!
//! Each configured service maps to a project directory and a compose file.
//! Requests name a service and an action; the agent resolves the service,
//! runs the matching `docker compose` invocation and reports the combined
//! output back to the caller.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Configuration file parsing and validation
//! - [`error`] - Error types and error handling
//! - [`server`] - HTTP routing and handlers
//! - [`service`] - Registry, status prober and action dispatcher
//! - [`version`] - Build metadata

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod version;

// Re-exports for convenience
pub use cli::Cli;
pub use config::Config;
pub use error::{ErrorCode, ManagerError, Result};
pub use server::serve;
pub use service::ServiceManager;
