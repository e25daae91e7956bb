//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table};
use tracing::{debug, info};

use crate::backend::{EnvSource, OptionResolver, ProcessEnv, StateFlags};
use crate::config::Config;
use crate::error::{Result, TerrariumError};
use crate::terraform::{Terraform, TerraformRunner};
use crate::vars::MergedVars;

/// Get the full version string with build information
fn get_version() -> &'static str {
    env!("VERSION_WITH_GIT")
}

/// Get build information for display
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        git_branch: env!("GIT_BRANCH"),
        full_version: env!("VERSION_WITH_GIT"),
    }
}

#[derive(Debug)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    pub full_version: &'static str,
}

#[derive(Parser)]
#[command(name = "terrarium")]
#[command(about = "Run terraform against workspaces and stacks with S3 remote state")]
#[command(version = get_version(), author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Terraform binary to execute
    #[arg(long, global = true, value_name = "PATH")]
    pub terraform: Option<String>,

    /// Directory holding the root-level var files
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a stack for a workspace, configuring S3/DynamoDB remote state
    Init {
        /// Workspace name, selects `<workspace>.tfvars.json`
        workspace: String,
        /// Path to the stack directory
        stack: PathBuf,
        #[command(flatten)]
        state: StateFlags,
    },
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show version and build information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration file path
    Path,
}

impl Cli {
    /// Apply global flags on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.debug {
            config.debug = true;
        }
        if let Some(binary) = &self.terraform {
            config.terraform_binary = binary.clone();
        }
        if let Some(root) = &self.root {
            config.var_root = root.to_string_lossy().into_owned();
        }
    }

    /// Apply global flags, then validate for every command except `config`,
    /// which must keep working while the configuration file is broken
    pub fn resolve_config(&self, mut config: Config) -> Result<Config> {
        self.apply_overrides(&mut config);
        if !matches!(self.command, Commands::Config { .. }) {
            config.validate()?;
        }
        Ok(config)
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        let config = self.resolve_config(config)?;

        match self.command {
            Commands::Init {
                workspace,
                stack,
                state,
            } => {
                let terraform = Terraform::new(config.terraform_binary.clone(), config.no_color);
                execute_init_command(&workspace, &stack, &state, &config, &terraform, &ProcessEnv)
                    .await
            }
            Commands::Config { command } => execute_config_command(command, &config).await,
            Commands::Version => execute_version_command(&config).await,
        }
    }
}

/// Resolve backend options for `stack` and run `terraform init` there
pub async fn execute_init_command(
    workspace: &str,
    stack: &Path,
    flags: &StateFlags,
    config: &Config,
    runner: &dyn TerraformRunner,
    env: &dyn EnvSource,
) -> Result<()> {
    validate_init_args(workspace, stack)?;

    let vars = MergedVars::load(&config.var_root_dir(), stack, workspace).await?;
    debug!(
        "Merged {} variables from {} var file(s)",
        vars.len(),
        vars.files().len()
    );

    let resolver = OptionResolver::new(flags, &vars, env);
    let options = resolver.build_init_options(stack)?;

    info!("Initializing stack {} for workspace {}", stack.display(), workspace);
    runner.init(stack, &options).await
}

/// Workspace must be a plain name and the stack an existing directory
pub fn validate_init_args(workspace: &str, stack: &Path) -> Result<()> {
    if workspace.trim().is_empty() {
        return Err(TerrariumError::invalid_argument("workspace must not be empty"));
    }

    if workspace.contains('/') || workspace.contains('\\') {
        return Err(TerrariumError::invalid_argument(format!(
            "workspace '{workspace}' must not contain path separators"
        )));
    }

    if !stack.is_dir() {
        return Err(TerrariumError::invalid_argument(format!(
            "stack '{}' is not a directory",
            stack.display()
        )));
    }

    Ok(())
}

async fn execute_config_command(command: ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => execute_config_show(config, json).await,
        ConfigCommands::Path => execute_config_path().await,
    }
}

async fn execute_config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(config)?;
        println!("{json_output}");
    } else {
        let mut table = Table::new([config.clone()]);
        table.with(Style::modern());
        println!("{table}");
    }

    Ok(())
}

async fn execute_config_path() -> Result<()> {
    let config_path = Config::get_config_path()?;
    println!("{}", config_path.display());
    Ok(())
}

async fn execute_version_command(config: &Config) -> Result<()> {
    let build_info = get_build_info();
    let terraform = Terraform::new(config.terraform_binary.clone(), config.no_color);
    let terraform_version = terraform
        .version()
        .await
        .unwrap_or_else(|| "not found".to_string());

    println!("terrarium");
    println!("=========");
    println!("Version:      {}", build_info.version);
    println!("Full Version: {}", build_info.full_version);
    println!("Git Hash:     {}", build_info.git_hash);
    println!("Git Branch:   {}", build_info.git_branch);
    println!("Terraform:    {} ({})", terraform_version, terraform.binary());

    Ok(())
}
