//! Plugin configuration.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── options     # PluginOptions, RuntimeCaching (user-facing, serde)
//! ├── import      # ImportScript tagged variant
//! ├── state       # DerivedState, OverrideSet (per build cycle)
//! ├── generator   # GeneratorConfig + layered merge
//! ├── error       # ConfigError
//! ├── util        # config file lookup, `~` expansion
//! └── mod.rs      # PluginConfig (this file)
//! ```
//!
//! `PluginConfig` is built once when the plugin is constructed and never
//! changes afterwards. Patterns are compiled here so a malformed one fails
//! before the first build cycle.

mod error;
mod generator;
mod import;
mod options;
mod state;
mod util;

pub use error::ConfigError;
pub use generator::GeneratorConfig;
pub use import::ImportScript;
pub use options::{PluginOptions, RuntimeCacheOptions, RuntimeCaching, RuntimeHandler};
pub use state::{DerivedState, OverrideSet};
pub use util::find_config_file;

use crate::log;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache identifier used when `cacheId` is unset.
pub const DEFAULT_CACHE_ID: &str = "sw-precache-webpack-plugin";
/// Worker file name used when `filename` is unset.
pub const DEFAULT_WORKER_FILENAME: &str = "service-worker.js";
/// Default `directoryIndex`.
pub const DEFAULT_DIRECTORY_INDEX: &str = "index.html";
/// Default `ignoreUrlParametersMatching`.
pub const DEFAULT_IGNORE_URL_PARAMETERS: &[&str] = &["^utm_"];
/// Default `maximumFileSizeToCacheInBytes` (2 MiB).
pub const DEFAULT_MAXIMUM_FILE_SIZE: u64 = 2 * 1024 * 1024;
/// Config file looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "precache.toml";

/// Validated, immutable plugin configuration.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    options: PluginOptions,
    ignore_patterns: Vec<Regex>,
    filename: String,
    filepath: Option<PathBuf>,
}

impl PluginConfig {
    /// Validate options and compile their patterns.
    pub fn new(mut options: PluginOptions) -> Result<Self, ConfigError> {
        let ignore_patterns = options
            .static_file_globs_ignore_patterns
            .iter()
            .map(|pattern| compile("staticFileGlobsIgnorePatterns", pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let filename = options
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_WORKER_FILENAME.to_string());
        if filename.trim().is_empty() {
            return Err(ConfigError::Validation("filename must not be empty".into()));
        }

        let filepath = options.filepath.as_deref().map(util::expand_tilde);
        if let Some(template) = options.template_file_path.take() {
            options.template_file_path = Some(util::expand_tilde(&template));
        }

        Ok(Self {
            options,
            ignore_patterns,
            filename,
            filepath,
        })
    }

    /// Raw user options.
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Compiled `staticFileGlobsIgnorePatterns`.
    pub fn ignore_patterns(&self) -> &[Regex] {
        &self.ignore_patterns
    }

    /// Worker file name (default applied).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Explicit worker location, if configured.
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn merge_statics(&self) -> bool {
        self.options.merge_statics_config
    }

    pub fn minify(&self) -> bool {
        self.options.minify
    }

    pub fn force_delete(&self) -> bool {
        self.options.force_delete
    }

    pub fn verbose(&self) -> bool {
        self.options.verbose.unwrap_or(false)
    }
}

impl PluginOptions {
    /// Parse TOML content, collecting any unknown keys.
    pub fn parse_toml(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let options = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((options, ignored))
    }

    /// Parse JSON content, collecting any unknown keys.
    pub fn parse_json(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let options = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        deserializer.end()?;
        Ok((options, ignored))
    }

    /// Load options from a `.toml` or `.json` file, warning about unknown keys.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let (options, ignored) = if is_json {
            Self::parse_json(&content)?
        } else {
            Self::parse_toml(&content)?
        };

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(options)
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown options in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}
