//! Compose command construction.

use crate::config::ServiceSpec;
use crate::error::{ManagerError, Result};
use crate::service::runner::Invocation;

/// The orchestration program and its leading arguments, e.g. `docker compose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    program: String,
    prefix: Vec<String>,
}

impl ComposeCommand {
    /// Parses a command line such as `docker compose` or `docker-compose`.
    pub fn parse(command: &str) -> Result<Self> {
        let mut words = shell_words::split(command).map_err(|e| {
            ManagerError::config_with_source(
                format!("compose_command '{}' cannot be parsed", command),
                e,
            )
        })?;

        if words.is_empty() {
            return Err(ManagerError::config("compose_command must not be empty"));
        }

        let program = words.remove(0);
        Ok(Self {
            program,
            prefix: words,
        })
    }

    /// Returns the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds `<program> <prefix> -f <compose_file> <args>` for a service,
    /// run in its project directory.
    pub fn invocation<I>(&self, spec: &ServiceSpec, args: I) -> Invocation
    where
        I: IntoIterator<Item = String>,
    {
        let mut all_args = self.prefix.clone();
        all_args.push("-f".to_string());
        all_args.push(spec.compose_file.clone());
        all_args.extend(args);

        Invocation {
            program: self.program.clone(),
            args: all_args,
            working_dir: spec.project_path.clone(),
        }
    }
}

impl Default for ComposeCommand {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            prefix: vec!["compose".to_string()],
        }
    }
}
