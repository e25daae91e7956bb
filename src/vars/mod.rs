//! Merged variables from workspace and stack var files
//!
//! Var files are JSON objects (`*.tfvars.json`). They are layered so that
//! stack files override root files and workspace files override `global`.

pub mod merged;

pub use merged::*;
