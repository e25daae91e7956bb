//! Terraform invocation
//!
//! `InitOption` models the arguments handed to `terraform init`;
//! `TerraformRunner` is the seam the CLI executes them through.

pub mod executor;
pub mod options;

pub use executor::*;
pub use options::*;
