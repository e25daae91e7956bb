//! Configuration management module
//!
//! Tool settings come from command-line arguments, environment variables,
//! the configuration file, and default values.

pub mod settings;

pub use settings::*;
