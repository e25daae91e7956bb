use std::path::PathBuf;
use thiserror::Error;

/// Main error type for terrarium operations
#[derive(Debug, Error)]
pub enum TerrariumError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(
        "unable to configure remote state, 'region' was not found in var files and not provided \
         with '--state-region' nor was AWS_REGION or AWS_DEFAULT_REGION found in global environment"
    )]
    MissingRegion,

    #[error("Invalid var file {}: {message}", .path.display())]
    VarFileError { path: PathBuf, message: String },

    #[error("Terraform binary '{binary}' could not be executed: {details}")]
    TerraformNotFound { binary: String, details: String },

    #[error("'{command}' failed with {}", describe_exit(.code))]
    TerraformFailed { command: String, code: Option<i32> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TerrariumError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn var_file<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self::VarFileError {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn terraform_not_found<S: Into<String>>(binary: S, details: S) -> Self {
        Self::TerraformNotFound {
            binary: binary.into(),
            details: details.into(),
        }
    }

    pub fn terraform_failed<S: Into<String>>(command: S, code: Option<i32>) -> Self {
        Self::TerraformFailed {
            command: command.into(),
            code,
        }
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type alias for terrarium operations
pub type Result<T> = std::result::Result<T, TerrariumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_region_message_names_all_sources() {
        let msg = TerrariumError::MissingRegion.to_string();
        assert!(msg.contains("'region'"));
        assert!(msg.contains("--state-region"));
        assert!(msg.contains("AWS_REGION"));
        assert!(msg.contains("AWS_DEFAULT_REGION"));
    }

    #[test]
    fn test_terraform_failed_message() {
        let err = TerrariumError::terraform_failed("terraform init", Some(1));
        assert_eq!(err.to_string(), "'terraform init' failed with exit code 1");

        let err = TerrariumError::terraform_failed("terraform init", None);
        assert!(err.to_string().contains("terminated by signal"));
    }
}
