use std::fmt;

/// A single argument of `terraform init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOption {
    /// `-backend-config=<key>=<value>`
    BackendConfig(String),
    /// `-backend=<bool>`
    Backend(bool),
    /// `-upgrade=<bool>`
    Upgrade(bool),
}

impl InitOption {
    pub fn backend_config<K: fmt::Display, V: fmt::Display>(key: K, value: V) -> Self {
        Self::BackendConfig(format!("{key}={value}"))
    }

    /// Render as a command-line argument
    pub fn to_arg(&self) -> String {
        match self {
            Self::BackendConfig(pair) => format!("-backend-config={pair}"),
            Self::Backend(enabled) => format!("-backend={enabled}"),
            Self::Upgrade(enabled) => format!("-upgrade={enabled}"),
        }
    }
}

impl fmt::Display for InitOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}
