//! Command dispatch

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, Outcome};
use crate::cli::args::{
    Cli, Commands, ConfigCommands, EnvironmentAddArgs, EnvironmentCommands, PolicyCommands,
    PolicyNewArgs,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult, OutputFormat};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{EnvironmentParams, JobView, PolicyParameterSet, PolicyParams};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{AssumeYes, Confirmer, PromptConfirmer};
use crate::infrastructure::InfraError;

/// Run the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(cli, command),
        _ => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings, confirmer_for(cli))?;
            dispatch(cli, &container)
        }
    }
}

/// Run a service command against an existing container.
pub fn dispatch(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Environment { command }) => match command {
            EnvironmentCommands::Add(args) => cmd_environment_add(container, args, cli.output),
            EnvironmentCommands::List => cmd_environment_list(container, cli.output),
            EnvironmentCommands::Show { name } => {
                cmd_environment_show(container, name, cli.output)
            }
        },
        Some(Commands::Policy {
            command: PolicyCommands::New(args),
        })
        | Some(Commands::NewAsrPolicy(args)) => cmd_policy_new(container, args, cli.output),
        Some(Commands::Config { .. }) | Some(Commands::Completion { .. }) | None => Err(
            CliError::Usage("command does not use services".to_string()),
        ),
    }
}

/// Reports the operation and declines it (`--what-if`).
#[derive(Debug, Default)]
pub struct WhatIf;

impl Confirmer for WhatIf {
    fn confirm(&self, action: &str, target: &str) -> ApplicationResult<bool> {
        output::what_if(action, target);
        Ok(false)
    }
}

fn confirmer_for(cli: &Cli) -> Arc<dyn Confirmer> {
    if cli.what_if {
        Arc::new(WhatIf)
    } else if cli.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(PromptConfirmer)
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load_file(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| InfraError::io("get current directory", e))?;
            Settings::load(Some(cwd.as_path()))?
        }
    };
    debug!("settings: base_dir={}", settings.base_dir.display());
    Ok(settings)
}

// ============================================================
// Environment commands
// ============================================================

#[instrument(skip(container, args), fields(name = %args.name))]
fn cmd_environment_add(
    container: &ServiceContainer,
    args: &EnvironmentAddArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let params = EnvironmentParams::from(args.clone());
    match container.environment_service().add(&params)? {
        Outcome::Completed(record) => output::environment(&record, format),
        Outcome::Declined => {
            info!("environment {} not added", params.name);
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn cmd_environment_list(container: &ServiceContainer, format: OutputFormat) -> CliResult<()> {
    let records = container.environment_service().list()?;
    output::environments(&records, format)
}

#[instrument(skip(container))]
fn cmd_environment_show(
    container: &ServiceContainer,
    name: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let record = container.environment_service().get(name)?;
    output::environment(&record, format)
}

// ============================================================
// Policy commands
// ============================================================

#[instrument(skip(container, args), fields(name = ?args.name))]
fn cmd_policy_new(
    container: &ServiceContainer,
    args: &PolicyNewArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let mode = args
        .mode
        .as_deref()
        .map(PolicyParameterSet::from_selector)
        .transpose()
        .map_err(ApplicationError::from)?;
    let params = PolicyParams::from(args.clone());

    match container.policy_service().create(&params, mode)? {
        Outcome::Completed(job) => output::job(&JobView::from(job), format),
        Outcome::Declined => {
            info!("policy {:?} not created", params.name);
            Ok(())
        }
    }
}

// ============================================================
// Config commands
// ============================================================

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => cmd_config_init(*global, *force),
        ConfigCommands::Path => cmd_config_path(cli),
    }
}

#[instrument]
fn cmd_config_init(global: bool, force: bool) -> CliResult<()> {
    let path = config_target(global)?;
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    fs::write(&path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("Created {}", path.display()));
    Ok(())
}

fn config_target(global: bool) -> CliResult<PathBuf> {
    if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))
    } else {
        let cwd =
            std::env::current_dir().map_err(|e| InfraError::io("get current directory", e))?;
        Ok(local_config_path(&cwd))
    }
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    fn mark(p: &Path) -> &'static str {
        if p.exists() {
            ""
        } else {
            " (not found)"
        }
    }

    output::header("Config files");
    if let Some(global) = global_config_path() {
        output::field("global", &format!("{}{}", global.display(), mark(&global)));
    }
    let local = config_target(false)?;
    output::field("local", &format!("{}{}", local.display(), mark(&local)));
    if let Some(explicit) = &cli.config {
        output::field("--config", &format!("{}{}", explicit.display(), mark(explicit)));
    }

    let settings = load_settings(cli)?;
    let profile = settings.profile_path();
    output::field("profile", &format!("{}{}", profile.display(), mark(&profile)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_what_if_confirmer_when_asked_then_declines() {
        assert!(!WhatIf.confirm("New policy", "p1").unwrap());
    }
}
