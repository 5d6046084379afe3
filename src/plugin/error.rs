//! Plugin error and warning types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::write::WriteError;
use crate::config::ConfigError;
use crate::generator::GenerationError;
use crate::minify::MinificationError;

/// A failed build step. Every variant aborts the cycle.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("manifest generation failed")]
    Generation(#[from] GenerationError),

    #[error("minification failed")]
    Minification(#[from] MinificationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("no build cycle configured; call configure() first")]
    NotConfigured,
}

/// Non-fatal configuration issue, forwarded to the build's warning channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationWarning {
    /// Worker written outside the default location.
    CustomFilepath(PathBuf),
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomFilepath(path) => write!(
                f,
                "service worker written to custom filepath {}; it may not be served from \
                 the scope it needs to control",
                path.display()
            ),
        }
    }
}
