//! Error types for configuration loading.
//!
//! The simulation itself never fails: placement and generation problems are
//! resolved in place with fallbacks. Only external configuration can be wrong.

use std::fmt;

/// Reasons a game configuration could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(String),
    /// The configuration is not valid JSON for `GameConfig`.
    Parse(String),
    /// The configuration parsed but breaks a rule.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {msg}"),
            ConfigError::Parse(msg) => write!(f, "cannot parse config: {msg}"),
            ConfigError::Invalid(why) => write!(f, "invalid config: {why}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}
