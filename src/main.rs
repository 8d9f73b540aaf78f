//! container-manager - HTTP control plane for docker compose projects
//!
//! Entry point for the container-manager application.

use clap::Parser;
use container_manager::cli::{Cli, Commands, ConfigCommands};
use container_manager::config::{Config, LogFormat};
use container_manager::error::exit_code;
use container_manager::service::ComposeCommand;
use container_manager::version;
use std::process::ExitCode;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(exit_code::GENERAL_ERROR as u8);
    }

    // Every log line below carries the build metadata fields.
    let _span = version::root_span().entered();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code(), "{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Initialize the tracing subscriber based on CLI options.
///
/// `RUST_LOG` takes precedence over `-v`/`-q` when set.
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match cli.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}

/// Main application logic.
fn run(cli: Cli) -> container_manager::Result<()> {
    match &cli.command {
        Commands::Start => cmd_start(&cli),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
        Commands::Config(subcmd) => cmd_config(&cli, subcmd),
    }
}

/// Handle the `start` command.
fn cmd_start(cli: &Cli) -> container_manager::Result<()> {
    let config = Config::load(&cli.config)?;
    let compose = ComposeCommand::parse(&config.compose_command)?;

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.bind_address,
        port = config.port,
        compose_program = compose.program(),
        compose_command = %config.compose_command,
        services = config.services.len(),
        "Starting container-manager"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(container_manager::serve(&config).in_current_span())
}

/// Handle the `version` command.
fn cmd_version() {
    println!("{}", version::version_text());
}

/// Handle the `config` subcommand.
fn cmd_config(cli: &Cli, subcmd: &ConfigCommands) -> container_manager::Result<()> {
    match subcmd {
        ConfigCommands::Validate => match Config::load(&cli.config) {
            Ok(config) => {
                println!(
                    "✓ Configuration is valid ({} services)",
                    config.services.len()
                );
                tracing::debug!(?config, "Validated configuration");
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid: {}", e);
                Err(e)
            }
        },
        ConfigCommands::Show => {
            let config = Config::load(&cli.config)?;
            let yaml = serde_yaml::to_string(&config).map_err(|e| {
                container_manager::ManagerError::config_with_source(
                    "Failed to serialize configuration",
                    e,
                )
            })?;
            println!("{}", yaml);
            Ok(())
        }
    }
}
