//! Manifest generation.
//!
//! Turns a resolved [`GeneratorConfig`] into the text of a service worker:
//!
//! - **files**: expand `staticFileGlobs` into existing files
//! - **entries**: hash contents, rewrite local paths into public URLs
//! - **template**: render the worker script around the precache list
//!
//! [`ManifestGenerator`] is the seam the plugin calls through; the built-in
//! [`PrecacheGenerator`] is what the CLI uses.

pub mod entries;
pub mod files;
pub mod template;

use std::path::PathBuf;

use rayon::prelude::*;
use regex::Regex;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::{debug, log};
use entries::PrecacheEntry;
use template::{Template, WorkerVars};

/// Produces worker script text from a resolved configuration.
pub trait ManifestGenerator: Send + Sync {
    fn generate(&self, config: &GeneratorConfig) -> Result<String, GenerationError>;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid {field} pattern `{pattern}`: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid glob `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] ignore::Error),

    #[error("generator task did not complete: {0}")]
    Interrupted(String),
}

/// Built-in generator: file hashing plus the embedded worker template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecacheGenerator;

impl PrecacheGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Precache entries for the configured files and dynamic URLs.
    pub fn entries(&self, config: &GeneratorConfig) -> Result<Vec<PrecacheEntry>, GenerationError> {
        let files = files::expand(&config.static_file_globs)?;
        let limit = config.maximum_file_size_to_cache_in_bytes;

        let hashed: Vec<Option<PrecacheEntry>> = files
            .par_iter()
            .map(|path| {
                let size = std::fs::metadata(path)
                    .map_err(|err| GenerationError::Io(path.clone(), err))?
                    .len();
                if size > limit {
                    log!(
                        "precache";
                        "skipping {} ({} bytes, limit {})",
                        path.display(),
                        size,
                        limit
                    );
                    return Ok(None);
                }
                let revision = entries::file_revision(path)?;
                let url = entries::url_for(path, &config.strip_prefix_multi);
                if config.verbose {
                    log!("precache"; "caching {} ({} bytes)", url, size);
                }
                Ok(Some(PrecacheEntry { url, revision }))
            })
            .collect::<Result<_, GenerationError>>()?;

        let mut seen = FxHashSet::default();
        let mut result: Vec<PrecacheEntry> = hashed
            .into_iter()
            .flatten()
            .filter(|entry| seen.insert(entry.url.clone()))
            .collect();

        for (url, dependencies) in &config.dynamic_url_to_dependencies {
            let revision = entries::dependencies_revision(dependencies)?;
            if seen.insert(url.clone()) {
                result.push(PrecacheEntry {
                    url: url.clone(),
                    revision,
                });
            } else if let Some(entry) = result.iter_mut().find(|e| &e.url == url) {
                entry.revision = revision;
            }
        }

        Ok(result)
    }
}

impl ManifestGenerator for PrecacheGenerator {
    fn generate(&self, config: &GeneratorConfig) -> Result<String, GenerationError> {
        validate_patterns(config)?;
        let entries = self.entries(config)?;
        debug!("precache"; "{} entries", entries.len());

        let template = Template::for_config(config)?;
        Ok(template.render(&WorkerVars {
            entries: &entries,
            config,
        }))
    }
}

/// Reject regex-valued options the worker would fail to construct.
fn validate_patterns(config: &GeneratorConfig) -> Result<(), GenerationError> {
    let check = |field: &'static str, pattern: &str| {
        Regex::new(pattern)
            .map(drop)
            .map_err(|source| GenerationError::InvalidPattern {
                field,
                pattern: pattern.to_string(),
                source,
            })
    };

    for pattern in &config.ignore_url_parameters_matching {
        check("ignoreUrlParametersMatching", pattern)?;
    }
    for pattern in &config.navigate_fallback_whitelist {
        check("navigateFallbackWhitelist", pattern)?;
    }
    if let Some(pattern) = &config.dont_cache_bust_urls_matching {
        check("dontCacheBustUrlsMatching", pattern)?;
    }
    for rule in &config.runtime_caching {
        check("runtimeCaching.urlPattern", &rule.url_pattern)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(dir.path().join("main.js"), "console.log(1)").unwrap();
        fs::write(dir.path().join("big.bin"), vec![0u8; 64]).unwrap();
        dir
    }

    fn config_for(dir: &TempDir, files: &[&str]) -> GeneratorConfig {
        let root = dir.path().to_string_lossy().into_owned();
        GeneratorConfig {
            static_file_globs: files
                .iter()
                .map(|f| dir.path().join(f).to_string_lossy().into_owned())
                .collect(),
            strip_prefix_multi: BTreeMap::from([(format!("{root}/"), "/app/".to_string())]),
            ..GeneratorConfig::default()
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_entries_keep_input_order() {
        let dir = site();
        let config = config_for(&dir, &["main.js", "index.html"]);
        let entries = PrecacheGenerator.entries(&config).unwrap();

        assert_eq!(
            entries,
            vec![
                PrecacheEntry {
                    url: "/app/main.js".into(),
                    revision: hash::revision("console.log(1)"),
                },
                PrecacheEntry {
                    url: "/app/index.html".into(),
                    revision: hash::revision("<h1>hi</h1>"),
                },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_oversized_files_are_skipped() {
        let dir = site();
        let mut config = config_for(&dir, &["main.js", "big.bin"]);
        config.maximum_file_size_to_cache_in_bytes = 32;

        let entries = PrecacheGenerator.entries(&config).unwrap();
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/app/main.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dynamic_urls_are_appended() {
        let dir = site();
        let mut config = config_for(&dir, &["main.js"]);
        config.dynamic_url_to_dependencies = BTreeMap::from([(
            "/shell".to_string(),
            vec![dir.path().join("index.html"), dir.path().join("main.js")],
        )]);

        let entries = PrecacheGenerator.entries(&config).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].url, "/shell");
        assert_eq!(entries[1].revision, hash::revision("<h1>hi</h1>console.log(1)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_renders_entries() {
        let dir = site();
        let config = config_for(&dir, &["main.js"]);
        let output = PrecacheGenerator.generate(&config).unwrap();

        assert!(output.contains("/app/main.js"));
        assert!(output.contains(&hash::revision("console.log(1)")));
    }

    #[test]
    fn test_generate_rejects_bad_patterns() {
        let config = GeneratorConfig {
            navigate_fallback_whitelist: vec!["(".into()],
            ..GeneratorConfig::default()
        };
        match PrecacheGenerator.generate(&config) {
            Err(GenerationError::InvalidPattern { field, .. }) => {
                assert_eq!(field, "navigateFallbackWhitelist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
