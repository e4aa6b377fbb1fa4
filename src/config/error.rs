//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading `conductor.toml`.
///
/// Site settings (`config.yaml`) never produce these: that document degrades
/// to an empty mapping instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}
