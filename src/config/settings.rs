//! Configuration settings management
//!
//! This module handles loading tool settings from the configuration file and
//! the environment.

use crate::error::{Result, TerrariumError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabled::Tabled;
use tracing::debug;

pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq)]
#[serde(default)]
pub struct Config {
    #[tabled(rename = "Debug")]
    pub debug: bool,
    #[tabled(rename = "Terraform Binary")]
    pub terraform_binary: String,
    /// Directory holding the root-level var files; empty means the current directory
    #[tabled(rename = "Var Root")]
    pub var_root: String,
    #[tabled(rename = "No Color")]
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            terraform_binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            var_root: String::new(),
            no_color: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.terraform_binary.trim().is_empty() {
            return Err(TerrariumError::config("terraform_binary must not be empty"));
        }

        Ok(())
    }

    /// Root directory for `global`/`<workspace>` var files
    pub fn var_root_dir(&self) -> PathBuf {
        if self.var_root.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.var_root)
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        // XDG layout on Linux and macOS, platform config dir elsewhere
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| TerrariumError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("terrarium").join("terrarium.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| TerrariumError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("terrarium").join("terrarium.toml"))
        }
    }
}

/// Load configuration from multiple sources with priority order:
/// 1. Command-line flags (applied by the caller)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Default values
///
/// Nothing is validated here; the caller validates once the flags are applied.
pub async fn load_config() -> Result<Config> {
    let config_path = Config::get_config_path()?;
    load_config_from(&config_path, |key| std::env::var(key).ok()).await
}

/// Load `path` if it exists, then apply environment overrides from `lookup`
pub async fn load_config_from<F>(path: &Path, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        config = load_from_file(path).await?;
    }

    load_from_env(&mut config, lookup);

    Ok(config)
}

async fn load_from_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;
    parse_config(&contents)
}

/// Parse a configuration document, TOML first and JSON as fallback
pub fn parse_config(contents: &str) -> Result<Config> {
    match toml::from_str::<Config>(contents) {
        Ok(config) => Ok(config),
        // A document opening with `{` is JSON, report its own error
        Err(_) if contents.trim_start().starts_with('{') => {
            Ok(serde_json::from_str::<Config>(contents)?)
        }
        Err(toml_err) => Err(toml_err.into()),
    }
}

fn load_from_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = lookup("TERRARIUM_TERRAFORM_BINARY") {
        if !value.is_empty() {
            config.terraform_binary = value;
        }
    }

    if let Some(value) = lookup("TERRARIUM_ROOT") {
        config.var_root = value;
    }

    // NO_COLOR disables color when present and non-empty
    if let Some(value) = lookup("NO_COLOR") {
        if !value.is_empty() {
            config.no_color = true;
        }
    }
}
