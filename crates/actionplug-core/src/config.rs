//! Dispatch configuration.
//!
//! A configuration is given once to the registry and shared by every scope
//! in its chain. It can be written as TOML:
//!
//! ```toml
//! catch_panics = true
//! log_failures = true
//! unowned = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Runtime configuration for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Isolate handler panics and report them as failures.
    /// When false every handler still runs, then the first panic unwinds
    /// through `trigger`.
    pub catch_panics: bool,

    /// Log every isolated handler failure.
    pub log_failures: bool,

    /// Diagnostics for plugs that resolve to the root manager.
    pub unowned: UnownedPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            log_failures: true,
            unowned: UnownedPolicy::Silent,
        }
    }
}

impl DispatchConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

/// How a plug that no scope owns is reported when it reaches the root.
///
/// Resolution itself never fails: the root manager's (empty) handler set is
/// used either way.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnownedPolicy {
    #[default]
    Silent,
    Warn,
}
