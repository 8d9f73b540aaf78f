//! Error types and error handling for container-manager.
//!
//! This module defines all error types used throughout the application,
//! including error codes and CLI exit codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes attached to every error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// E001: Configuration file is invalid
    #[serde(rename = "E001")]
    ConfigInvalid,

    /// E002: Target service does not exist or is disabled
    #[serde(rename = "E002")]
    ServiceNotFound,

    /// E003: Action is not recognized
    #[serde(rename = "E003")]
    UnknownAction,

    /// E004: External command failed or could not be started
    #[serde(rename = "E004")]
    CommandFailed,

    /// E005: Request could not be parsed
    #[serde(rename = "E005")]
    RequestMalformed,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalid => "E001",
            ErrorCode::ServiceNotFound => "E002",
            ErrorCode::UnknownAction => "E003",
            ErrorCode::CommandFailed => "E004",
            ErrorCode::RequestMalformed => "E005",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLI exit codes.
pub mod exit_code {
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 2;
}

/// The main error type for container-manager.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Configuration file is invalid or cannot be loaded.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Service is not registered, or is registered but disabled.
    #[error("Service not found: {service}")]
    ServiceNotFound { service: String },

    /// Action is not one of the recognized verbs.
    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    /// External command exited non-zero or could not be spawned.
    #[error("Command '{command}' failed: {reason}")]
    CommandExecutionFailed {
        command: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP request body or query could not be interpreted.
    #[error("Malformed request: {message}")]
    RequestMalformed { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ManagerError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ManagerError::Config { .. } => ErrorCode::ConfigInvalid,
            ManagerError::ServiceNotFound { .. } => ErrorCode::ServiceNotFound,
            ManagerError::UnknownAction { .. } => ErrorCode::UnknownAction,
            ManagerError::CommandExecutionFailed { .. } => ErrorCode::CommandFailed,
            ManagerError::RequestMalformed { .. } => ErrorCode::RequestMalformed,
            ManagerError::Io(_) => ErrorCode::CommandFailed,
        }
    }

    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ManagerError::Config { .. } => exit_code::CONFIG_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        ManagerError::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a message and source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ManagerError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a command failure for a process that ran but exited unsuccessfully.
    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ManagerError::CommandExecutionFailed {
            command: command.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates a command failure for a process that could not be started.
    pub fn command_failed_with_source(
        command: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ManagerError::CommandExecutionFailed {
            command: command.into(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        ManagerError::RequestMalformed {
            message: message.into(),
        }
    }
}

/// Result type alias for container-manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
