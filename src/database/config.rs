use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::NameWrapper;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of generated column aliases, followed by a counter.
    pub alias_prefix: String,
    /// Preferred quoting for names that need it.
    pub name_wrapper: NameWrapper,
    /// Resolve every core of a compound SELECT instead of only the first.
    pub resolve_multi_core: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { alias_prefix: "ResCol_".to_string(), name_wrapper: NameWrapper::default(), resolve_multi_core: true }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias_prefix(prefix: &str) -> Self {
        Self { alias_prefix: prefix.to_string(), ..Self::default() }
    }

    pub fn with_name_wrapper(name_wrapper: NameWrapper) -> Self {
        Self { name_wrapper, ..Self::default() }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
