//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("options JSON parsing error")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern in `{field}`: `{pattern}`")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("importScripts references unknown chunk `{0}`")]
    UnknownChunk(String),

    #[error("chunk `{0}` did not emit any files")]
    EmptyChunk(String),
}
