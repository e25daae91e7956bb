//! terrarium - Terraform front-end
//!
//! Resolves S3/DynamoDB remote state settings for a workspace and stack from
//! flags, var files and the environment, then runs `terraform init`.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod terraform;
pub mod vars;

// Re-export commonly used types
pub use error::{Result, TerrariumError};
