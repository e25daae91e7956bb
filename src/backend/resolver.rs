//! Remote state option resolution
//!
//! Every backend setting is looked up in order: `--state-<name>` flag, then
//! the merged var files, then (region only) the AWS environment, then a
//! generated default. Empty values count as unset at every layer.

use clap::Args;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::naming::{generate_checked_name, NameRules, BUCKET_PREFIX, LOCK_TABLE_PREFIX};
use crate::error::{Result, TerrariumError};
use crate::terraform::InitOption;
use crate::vars::MergedVars;

/// Environment variables consulted for the region, in order
pub const REGION_ENV_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Source of environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Remote state flags of the `init` command
#[derive(Debug, Clone, PartialEq, Args)]
pub struct StateFlags {
    /// Initialize with remote state
    #[arg(
        short = 'r',
        long = "remote-state",
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub remote_state: bool,

    /// Initialize with state locking
    #[arg(
        long = "state-lock",
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub state_lock: bool,

    /// State bucket name
    #[arg(long = "state-bucket", value_name = "BUCKET")]
    pub state_bucket: Option<String>,

    /// DynamoDB table used for state locking
    #[arg(long = "state-dynamo", value_name = "TABLE")]
    pub state_dynamo: Option<String>,

    /// Region of the state bucket
    #[arg(long = "state-region", value_name = "REGION")]
    pub state_region: Option<String>,

    /// AWS account used in generated names
    #[arg(long = "state-account", value_name = "ACCOUNT")]
    pub state_account: Option<String>,

    /// State name, stored as `<name>.tfstate`
    #[arg(long = "state-name", value_name = "NAME")]
    pub state_name: Option<String>,
}

impl Default for StateFlags {
    fn default() -> Self {
        Self {
            remote_state: true,
            state_lock: true,
            state_bucket: None,
            state_dynamo: None,
            state_region: None,
            state_account: None,
            state_name: None,
        }
    }
}

impl StateFlags {
    /// Value of `--state-<name>`, if set and non-empty
    pub fn value(&self, name: &str) -> Option<&str> {
        let value = match name {
            "bucket" => self.state_bucket.as_deref(),
            "dynamo" => self.state_dynamo.as_deref(),
            "region" => self.state_region.as_deref(),
            "account" => self.state_account.as_deref(),
            "name" => self.state_name.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Resolves backend settings from flags, merged vars and the environment
pub struct OptionResolver<'a> {
    flags: &'a StateFlags,
    vars: &'a MergedVars,
    env: &'a dyn EnvSource,
}

impl<'a> OptionResolver<'a> {
    pub fn new(flags: &'a StateFlags, vars: &'a MergedVars, env: &'a dyn EnvSource) -> Self {
        Self { flags, vars, env }
    }

    /// Flag, then var file
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.flags
            .value(name)
            .map(str::to_string)
            .or_else(|| self.vars.get_string(name))
    }

    fn lookup_or_empty(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }

    /// Region is required; flag, var file, `AWS_REGION`, `AWS_DEFAULT_REGION`
    pub fn region(&self) -> Result<String> {
        if let Some(region) = self.lookup("region") {
            return Ok(region);
        }

        for key in REGION_ENV_VARS {
            if let Some(region) = self.env.var(key).filter(|v| !v.is_empty()) {
                debug!("Using region from {}", key);
                return Ok(region);
            }
        }

        Err(TerrariumError::MissingRegion)
    }

    /// `region` is the already resolved region, so a region taken from the
    /// environment also ends up in the generated name
    pub fn bucket(&self, region: &str) -> String {
        match self.lookup("bucket") {
            Some(bucket) => bucket,
            None => generate_checked_name(
                BUCKET_PREFIX,
                &self.lookup_or_empty("project"),
                region,
                &self.lookup_or_empty("account"),
                &NameRules::s3_bucket(),
            ),
        }
    }

    /// State key without the `.tfstate` suffix
    pub fn state_key(&self, stack: &Path) -> Result<String> {
        if let Some(name) = self.lookup("name") {
            return Ok(name);
        }
        default_state_name(stack)
    }

    /// Generated from the resolved region, like [`Self::bucket`]
    pub fn lock_table(&self, region: &str) -> String {
        match self.lookup("dynamo") {
            Some(table) => table,
            None => generate_checked_name(
                LOCK_TABLE_PREFIX,
                &self.lookup_or_empty("project"),
                region,
                &self.lookup_or_empty("account"),
                &NameRules::dynamodb_table(),
            ),
        }
    }

    /// Options for `terraform init`, `-upgrade=true` always last
    pub fn build_init_options(&self, stack: &Path) -> Result<Vec<InitOption>> {
        let mut options = Vec::new();

        if self.flags.remote_state {
            let region = self.region()?;
            let bucket = self.bucket(&region);
            let key = self.state_key(stack)?;
            info!(
                "Remote state: bucket={} key={}.tfstate region={}",
                bucket, key, region
            );

            options.push(InitOption::backend_config("region", &region));
            options.push(InitOption::backend_config("bucket", bucket));
            options.push(InitOption::backend_config("key", format!("{key}.tfstate")));

            if self.flags.state_lock {
                let table = self.lock_table(&region);
                info!("State locking with table {}", table);
                options.push(InitOption::backend_config("dynamodb_table", table));
            }
        } else {
            info!("Remote state disabled");
            options.push(InitOption::Backend(false));
        }

        options.push(InitOption::Upgrade(true));
        Ok(options)
    }
}

/// Base name of the stack path, e.g. `stacks/network/` gives `network`
pub fn default_state_name(stack: &Path) -> Result<String> {
    if let Some(name) = stack.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    // `.`, `..` and the like have no file name until canonicalized
    let canonical = stack.canonicalize()?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TerrariumError::invalid_argument(format!(
                "cannot derive a state name from stack path '{}'; use --state-name",
                stack.display()
            ))
        })
}
