//! S3/DynamoDB remote state backend configuration

pub mod naming;
pub mod resolver;

pub use naming::*;
pub use resolver::*;
