//! Command-line interface definition for container-manager.
//!
//! This module defines the CLI structure using clap derive macros,
//! including all subcommands and their arguments.

use crate::config::{LogFormat, LogLevel, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// container-manager - HTTP control plane for docker compose projects
///
/// Exposes pull, up, down, restart, stop, logs, ps and update for a fixed
/// set of compose projects declared in a YAML file.
#[derive(Debug, Parser)]
#[command(name = "container-manager")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = ENV_CONFIG_PATH, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Increase verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (json or text)
    #[arg(
        long,
        global = true,
        env = "CONTAINER_MANAGER_LOG_FORMAT",
        default_value = "json"
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the effective log level based on verbose/quiet flags.
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            return LogLevel::Error;
        }

        match self.verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start,

    /// Print version information
    Version,

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Validate,

    /// Show the effective configuration, environment overrides included
    Show,
}
