//! User-facing plugin options.
//!
//! Keys use the documented camelCase option names, both in TOML and JSON.
//!
//! # Example
//!
//! ```toml
//! cacheId = "my-app"
//! filename = "service-worker.js"
//! minify = true
//! staticFileGlobsIgnorePatterns = ['\.map$', 'asset-manifest\.json$']
//! importScripts = [{ chunkName = "sw-runtime" }]
//! navigateFallback = "/index.html"
//!
//! [[runtimeCaching]]
//! urlPattern = '^https://api\.example\.com/'
//! handler = "networkFirst"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::import::ImportScript;

/// Plugin options as supplied by the user.
///
/// `None`/empty means "use the default". Two groups live here:
/// pass-through options forwarded to the generator, and integration options
/// the plugin consumes itself (see [`PluginOptions::INTEGRATION_KEYS`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginOptions {
    // ---- pass-through ----
    /// Cache name component, distinguishes workers served from one origin.
    pub cache_id: Option<String>,
    /// File served for directory URLs (`/` → `/index.html`).
    pub directory_index: Option<String>,
    /// URL → files whose combined contents version that URL.
    pub dynamic_url_to_dependencies: BTreeMap<String, Vec<PathBuf>>,
    /// Emit a fetch handler answering from the precache.
    pub handle_fetch: Option<bool>,
    /// Query parameters ignored when matching cached URLs (regex sources).
    pub ignore_url_parameters_matching: Option<Vec<String>>,
    /// Extra scripts imported by the worker.
    pub import_scripts: Vec<ImportScript>,
    /// Files above this size are left out of the precache.
    pub maximum_file_size_to_cache_in_bytes: Option<u64>,
    /// URL answered for navigation requests that miss the cache.
    pub navigate_fallback: Option<String>,
    /// Navigation URLs eligible for the fallback (regex sources).
    pub navigate_fallback_whitelist: Vec<String>,
    /// URLs already carrying a version, fetched without a cache-busting query.
    pub dont_cache_bust_urls_matching: Option<String>,
    /// Runtime caching rules for requests outside the precache.
    pub runtime_caching: Vec<RuntimeCaching>,
    /// Custom worker template.
    pub template_file_path: Option<PathBuf>,
    /// Log every cached file.
    pub verbose: Option<bool>,
    /// Local path prefix → public URL prefix.
    pub strip_prefix_multi: BTreeMap<String, String>,
    /// Activate a new worker without waiting for old clients to close.
    pub skip_waiting: Option<bool>,
    /// Take control of open clients on activation.
    pub clients_claim: Option<bool>,

    // ---- integration ----
    /// File list that replaces (or extends, in merge mode) the emitted assets.
    pub static_file_globs: Option<Vec<String>>,
    /// Regex sources; matching entries are dropped from the file list.
    pub static_file_globs_ignore_patterns: Vec<String>,
    /// Worker file name inside the output directory.
    pub filename: Option<String>,
    /// Explicit worker location, bypassing output dir + filename.
    pub filepath: Option<PathBuf>,
    /// Concatenate/layer user lists onto derived ones instead of replacing.
    pub merge_statics_config: bool,
    /// Minify the generated worker.
    pub minify: bool,
    /// Delete a write-protected or out-of-scope previous worker file.
    pub force_delete: bool,
}

impl PluginOptions {
    /// Option keys consumed by the plugin and never forwarded to the generator.
    pub const INTEGRATION_KEYS: &'static [&'static str] = &[
        "staticFileGlobs",
        "staticFileGlobsIgnorePatterns",
        "filename",
        "filepath",
        "mergeStaticsConfig",
        "minify",
        "forceDelete",
    ];
}

/// A runtime caching rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeCaching {
    /// Regex source matched against request URLs.
    pub url_pattern: String,
    pub handler: RuntimeHandler,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RuntimeCacheOptions>,
}

/// Strategy used for a runtime caching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeHandler {
    NetworkFirst,
    CacheFirst,
    Fastest,
    NetworkOnly,
    CacheOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeCacheOptions {
    /// Dedicated cache name for this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_name: Option<String>,
    /// Oldest entries are evicted past this count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        let options: PluginOptions = toml::from_str("").unwrap();
        assert_eq!(options, PluginOptions::default());
        assert!(!options.merge_statics_config);
        assert!(!options.minify);
        assert!(!options.force_delete);
    }

    #[test]
    fn test_parse_camel_case_keys() {
        let options: PluginOptions = toml::from_str(
            r#"
            cacheId = "my-app"
            mergeStaticsConfig = true
            maximumFileSizeToCacheInBytes = 4096
            staticFileGlobs = ["dist/**/*.html"]
            staticFileGlobsIgnorePatterns = ['\.map$']

            [stripPrefixMulti]
            "dist/" = "/"

            [[runtimeCaching]]
            urlPattern = '^https://api\.example\.com/'
            handler = "networkFirst"
            options = { cacheName = "api", maxEntries = 20 }
            "#,
        )
        .unwrap();

        assert_eq!(options.cache_id.as_deref(), Some("my-app"));
        assert!(options.merge_statics_config);
        assert_eq!(options.maximum_file_size_to_cache_in_bytes, Some(4096));
        assert_eq!(options.static_file_globs, Some(vec!["dist/**/*.html".into()]));
        assert_eq!(options.static_file_globs_ignore_patterns, vec![r"\.map$"]);
        assert_eq!(options.strip_prefix_multi.get("dist/").map(String::as_str), Some("/"));
        assert_eq!(options.runtime_caching.len(), 1);
        assert_eq!(options.runtime_caching[0].handler, RuntimeHandler::NetworkFirst);
        assert_eq!(
            options.runtime_caching[0].options,
            Some(RuntimeCacheOptions {
                cache_name: Some("api".into()),
                max_entries: Some(20),
            })
        );
    }

    #[test]
    fn test_integration_keys_are_real_fields() {
        let options = PluginOptions {
            static_file_globs: Some(vec![]),
            filename: Some("sw.js".into()),
            filepath: Some("sw.js".into()),
            ..PluginOptions::default()
        };
        let json = serde_json::to_value(&options).unwrap();
        let object = json.as_object().unwrap();
        for key in PluginOptions::INTEGRATION_KEYS {
            assert!(object.contains_key(*key), "missing {key}");
        }
    }
}
