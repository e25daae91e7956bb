//! Process wrapper around the terraform binary
//!
//! The binary is spawned with the stack directory as working directory and
//! inherits stdio so terraform's own output reaches the user unchanged.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::options::InitOption;
use crate::error::{Result, TerrariumError};

/// Runs terraform operations for a stack
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerraformRunner: Send + Sync {
    /// Run `terraform init` in `working_dir` with the given options
    async fn init(&self, working_dir: &Path, options: &[InitOption]) -> Result<()>;
}

/// Terraform executed as an external process
#[derive(Debug, Clone)]
pub struct Terraform {
    binary: String,
    no_color: bool,
}

impl Terraform {
    pub fn new<S: Into<String>>(binary: S, no_color: bool) -> Self {
        Self {
            binary: binary.into(),
            no_color,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Full argument list for `init`
    pub fn init_args(&self, options: &[InitOption]) -> Vec<String> {
        let mut args = vec!["init".to_string(), "-input=false".to_string()];
        if self.no_color {
            args.push("-no-color".to_string());
        }
        args.extend(options.iter().map(InitOption::to_arg));
        args
    }

    /// Detected terraform version, `None` if the binary is unavailable
    pub async fn version(&self) -> Option<String> {
        let output = Command::new(&self.binary)
            .arg("version")
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        parse_version(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl TerraformRunner for Terraform {
    async fn init(&self, working_dir: &Path, options: &[InitOption]) -> Result<()> {
        let args = self.init_args(options);
        info!("Running {} init in {}", self.binary, working_dir.display());
        debug!("Arguments: {:?}", args);

        let status = Command::new(&self.binary)
            .args(&args)
            .current_dir(working_dir)
            .status()
            .await
            .map_err(|e| TerrariumError::terraform_not_found(self.binary.clone(), e.to_string()))?;

        if !status.success() {
            return Err(TerrariumError::terraform_failed(
                format!("{} init", self.binary),
                status.code(),
            ));
        }

        Ok(())
    }
}

/// Parse the first line of `terraform version`, e.g. `Terraform v1.6.0`
pub fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(|v| v.trim_start_matches('v').to_string())
}
