use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, TerrariumError};

const VAR_FILE_SUFFIX: &str = ".tfvars.json";
const GLOBAL_VAR_FILE: &str = "global";

/// Variables merged from every var file that applies to a workspace/stack pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedVars {
    values: Map<String, Value>,
    files: Vec<PathBuf>,
}

impl MergedVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build directly from a JSON object
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self {
            values,
            files: Vec::new(),
        }
    }

    /// Candidate var files in merge order, lowest precedence first
    pub fn var_files(root: &Path, stack: &Path, workspace: &str) -> Vec<PathBuf> {
        let workspace_file = format!("{workspace}{VAR_FILE_SUFFIX}");
        let global_file = format!("{GLOBAL_VAR_FILE}{VAR_FILE_SUFFIX}");

        vec![
            root.join(&global_file),
            root.join(&workspace_file),
            stack.join(&global_file),
            stack.join(&workspace_file),
        ]
    }

    /// Load and merge all existing var files for the given workspace and stack
    pub async fn load(root: &Path, stack: &Path, workspace: &str) -> Result<Self> {
        let mut merged = Self::new();

        for path in Self::var_files(root, stack, workspace) {
            if merged.files.contains(&path) {
                // root and stack can be the same directory
                continue;
            }
            if !path.is_file() {
                debug!("Skipping missing var file {}", path.display());
                continue;
            }

            let contents = tokio::fs::read_to_string(&path).await?;
            let values = parse_var_file(&path, &contents)?;
            debug!("Loaded {} variables from {}", values.len(), path.display());

            merged.merge(values);
            merged.files.push(path);
        }

        Ok(merged)
    }

    /// Overlay `values` on top of the current variables
    pub fn merge(&mut self, values: Map<String, Value>) {
        for (key, value) in values {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String form of a variable; `None` for missing, null or empty values
    pub fn get_string(&self, key: &str) -> Option<String> {
        let rendered = match self.values.get(key)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        if rendered.is_empty() {
            None
        } else {
            Some(rendered)
        }
    }

    /// Var files that were actually loaded, in merge order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_var_file(path: &Path, contents: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| TerrariumError::var_file(path, e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TerrariumError::var_file(
            path,
            "expected a JSON object at the top level",
        )),
    }
}
