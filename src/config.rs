use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::context::DEFAULT_UNSAFE_KEYS;

/// Engine settings, usually loaded from JSON.
///
/// ```json
/// { "unsafe_keys": ["constructor", "__proto__", "prototype"], "builtin_helpers": true }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Path segments that always resolve to nothing. `constructor`,
    /// `__proto__` and `prototype` are denied even when left out.
    #[serde(default = "default_unsafe_keys")]
    pub unsafe_keys: Vec<String>,
    #[serde(default)]
    pub builtin_helpers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unsafe_keys: default_unsafe_keys(),
            builtin_helpers: false,
        }
    }
}

fn default_unsafe_keys() -> Vec<String> {
    DEFAULT_UNSAFE_KEYS.iter().map(|k| k.to_string()).collect()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(s)?)
}
