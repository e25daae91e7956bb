//! Generated names for the remote state bucket and lock table
//!
//! Generated names are never rewritten. When a name would be rejected by AWS
//! a warning is logged so the user can set it explicitly.

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

pub const BUCKET_PREFIX: &str = "tf-state";
pub const LOCK_TABLE_PREFIX: &str = "terraform-lock";

static BUCKET_PATTERN: OnceLock<Regex> = OnceLock::new();
static TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// AWS naming rules for a backend resource
#[derive(Debug, Clone)]
pub struct NameRules {
    pub kind: &'static str,
    pub min_length: usize,
    pub max_length: usize,
    pub allowed_pattern: &'static Regex,
    pub description: &'static str,
}

impl NameRules {
    pub fn s3_bucket() -> Self {
        Self {
            kind: "state bucket",
            min_length: 3,
            max_length: 63,
            allowed_pattern: BUCKET_PATTERN.get_or_init(|| {
                Regex::new(r"^[a-z0-9][a-z0-9.-]*[a-z0-9]$").expect("bucket pattern is valid")
            }),
            description: "S3 bucket names must be 3-63 characters of a-z, 0-9, '.' and '-', starting and ending with a letter or digit",
        }
    }

    pub fn dynamodb_table() -> Self {
        Self {
            kind: "lock table",
            min_length: 3,
            max_length: 255,
            allowed_pattern: TABLE_PATTERN.get_or_init(|| {
                Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("table pattern is valid")
            }),
            description: "DynamoDB table names must be 3-255 characters of a-z, A-Z, 0-9, '_', '-' and '.'",
        }
    }
}

/// `<prefix>-<project>-<region>-<account>`
pub fn generate_name(prefix: &str, project: &str, region: &str, account: &str) -> String {
    format!("{prefix}-{project}-{region}-{account}")
}

/// Check a name against the given rules
pub fn is_valid_name(name: &str, rules: &NameRules) -> bool {
    if name.len() < rules.min_length || name.len() > rules.max_length {
        return false;
    }

    rules.allowed_pattern.is_match(name)
}

/// Generate a name and warn about anything AWS would reject
pub fn generate_checked_name(
    prefix: &str,
    project: &str,
    region: &str,
    account: &str,
    rules: &NameRules,
) -> String {
    let name = generate_name(prefix, project, region, account);

    for (segment, value) in [("project", project), ("account", account)] {
        if value.is_empty() {
            warn!(
                "Generated {} name '{}' has an empty {} segment",
                rules.kind, name, segment
            );
        }
    }

    if !is_valid_name(&name, rules) {
        warn!(
            "Generated {} name '{}' is not valid: {}",
            rules.kind, name, rules.description
        );
    }

    name
}
