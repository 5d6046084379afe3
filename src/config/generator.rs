//! Generator payload and the layered merge that produces it.
//!
//! Precedence, lowest to highest:
//!
//! ```text
//! defaults  <  user options  <  derived state  <  override set
//! ```
//!
//! Only pass-through options reach [`GeneratorConfig`]; integration options
//! (`filename`, `filepath`, `minify`, ...) have no field here.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::options::{PluginOptions, RuntimeCaching};
use super::state::{DerivedState, OverrideSet};
use super::{
    DEFAULT_CACHE_ID, DEFAULT_DIRECTORY_INDEX, DEFAULT_IGNORE_URL_PARAMETERS,
    DEFAULT_MAXIMUM_FILE_SIZE,
};

/// Fully resolved configuration handed to a manifest generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub cache_id: String,
    pub directory_index: Option<String>,
    pub dynamic_url_to_dependencies: BTreeMap<String, Vec<PathBuf>>,
    pub handle_fetch: bool,
    pub ignore_url_parameters_matching: Vec<String>,
    pub import_scripts: Vec<String>,
    pub maximum_file_size_to_cache_in_bytes: u64,
    pub navigate_fallback: Option<String>,
    pub navigate_fallback_whitelist: Vec<String>,
    pub dont_cache_bust_urls_matching: Option<String>,
    pub runtime_caching: Vec<RuntimeCaching>,
    pub template_file_path: Option<PathBuf>,
    pub verbose: bool,
    pub static_file_globs: Vec<String>,
    pub strip_prefix_multi: BTreeMap<String, String>,
    pub skip_waiting: bool,
    pub clients_claim: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cache_id: DEFAULT_CACHE_ID.to_string(),
            directory_index: Some(DEFAULT_DIRECTORY_INDEX.to_string()),
            dynamic_url_to_dependencies: BTreeMap::new(),
            handle_fetch: true,
            ignore_url_parameters_matching: DEFAULT_IGNORE_URL_PARAMETERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            import_scripts: Vec::new(),
            maximum_file_size_to_cache_in_bytes: DEFAULT_MAXIMUM_FILE_SIZE,
            navigate_fallback: None,
            navigate_fallback_whitelist: Vec::new(),
            dont_cache_bust_urls_matching: None,
            runtime_caching: Vec::new(),
            template_file_path: None,
            verbose: false,
            static_file_globs: Vec::new(),
            strip_prefix_multi: BTreeMap::new(),
            skip_waiting: true,
            clients_claim: true,
        }
    }
}

impl GeneratorConfig {
    /// Merge every layer into the payload for one build cycle.
    pub fn resolve(options: &PluginOptions, derived: &DerivedState, overrides: &OverrideSet) -> Self {
        let mut config = Self::default();
        config.apply_options(options);
        config.apply_derived(derived);
        config.apply_overrides(overrides);
        config
    }

    /// Layer the user's pass-through options over the defaults.
    fn apply_options(&mut self, options: &PluginOptions) {
        Self::update_option(&mut self.cache_id, options.cache_id.as_ref());
        Self::update_option(&mut self.handle_fetch, options.handle_fetch.as_ref());
        Self::update_option(
            &mut self.ignore_url_parameters_matching,
            options.ignore_url_parameters_matching.as_ref(),
        );
        Self::update_option(
            &mut self.maximum_file_size_to_cache_in_bytes,
            options.maximum_file_size_to_cache_in_bytes.as_ref(),
        );
        Self::update_option(&mut self.verbose, options.verbose.as_ref());
        Self::update_option(&mut self.skip_waiting, options.skip_waiting.as_ref());
        Self::update_option(&mut self.clients_claim, options.clients_claim.as_ref());

        // An empty directoryIndex disables directory URL mapping
        if let Some(index) = &options.directory_index {
            self.directory_index = (!index.is_empty()).then(|| index.clone());
        }
        if options.navigate_fallback.is_some() {
            self.navigate_fallback = options.navigate_fallback.clone();
        }
        if options.dont_cache_bust_urls_matching.is_some() {
            self.dont_cache_bust_urls_matching = options.dont_cache_bust_urls_matching.clone();
        }
        if options.template_file_path.is_some() {
            self.template_file_path = options.template_file_path.clone();
        }

        Self::update_nonempty(
            &mut self.dynamic_url_to_dependencies,
            &options.dynamic_url_to_dependencies,
        );
        Self::update_nonempty(
            &mut self.navigate_fallback_whitelist,
            &options.navigate_fallback_whitelist,
        );
        Self::update_nonempty(&mut self.runtime_caching, &options.runtime_caching);
    }

    /// Layer the build-derived file list and prefix mapping.
    fn apply_derived(&mut self, derived: &DerivedState) {
        self.static_file_globs = derived.static_file_globs.clone();
        self.strip_prefix_multi = derived.strip_prefix_multi.clone();
    }

    /// Layer values computed for this cycle only.
    fn apply_overrides(&mut self, overrides: &OverrideSet) {
        self.import_scripts = overrides.import_scripts.clone();
    }

    /// Update config option if a user value is provided.
    fn update_option<T: Clone>(config_option: &mut T, user_option: Option<&T>) {
        if let Some(option) = user_option {
            *config_option = option.clone();
        }
    }

    /// Replace a collection only when the user supplied entries.
    fn update_nonempty<T: Clone + IsEmpty>(config_option: &mut T, user_option: &T) {
        if !user_option.is_empty() {
            *config_option = user_option.clone();
        }
    }
}

/// Collections that may be left empty to mean "unset".
trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportScript;

    fn derived() -> DerivedState {
        DerivedState {
            assets: vec!["main.js".into()],
            output_dir: PathBuf::from("/out"),
            public_path: "/assets/".into(),
            static_file_globs: vec!["/out/main.js".into()],
            strip_prefix_multi: BTreeMap::from([("/out/".to_string(), "/assets/".to_string())]),
        }
    }

    fn overrides() -> OverrideSet {
        OverrideSet {
            import_scripts: vec!["/assets/sw-extra.js".into()],
            filepath: PathBuf::from("/out/service-worker.js"),
        }
    }

    #[test]
    fn test_defaults_apply_when_options_empty() {
        let config = GeneratorConfig::resolve(&PluginOptions::default(), &derived(), &overrides());

        assert_eq!(config.cache_id, DEFAULT_CACHE_ID);
        assert_eq!(config.directory_index.as_deref(), Some(DEFAULT_DIRECTORY_INDEX));
        assert!(config.handle_fetch);
        assert_eq!(config.ignore_url_parameters_matching, vec!["^utm_"]);
        assert_eq!(config.maximum_file_size_to_cache_in_bytes, DEFAULT_MAXIMUM_FILE_SIZE);
        assert_eq!(config.static_file_globs, vec!["/out/main.js"]);
        assert_eq!(config.import_scripts, vec!["/assets/sw-extra.js"]);
    }

    #[test]
    fn test_user_options_override_defaults() {
        let options = PluginOptions {
            cache_id: Some("my-app".into()),
            handle_fetch: Some(false),
            ignore_url_parameters_matching: Some(vec![]),
            directory_index: Some(String::new()),
            verbose: Some(true),
            ..PluginOptions::default()
        };
        let config = GeneratorConfig::resolve(&options, &derived(), &overrides());

        assert_eq!(config.cache_id, "my-app");
        assert!(!config.handle_fetch);
        assert!(config.ignore_url_parameters_matching.is_empty());
        assert_eq!(config.directory_index, None);
        assert!(config.verbose);
    }

    #[test]
    fn test_derived_state_beats_user_options() {
        let options = PluginOptions {
            strip_prefix_multi: BTreeMap::from([("/elsewhere/".to_string(), "/x/".to_string())]),
            ..PluginOptions::default()
        };
        let config = GeneratorConfig::resolve(&options, &derived(), &overrides());

        assert_eq!(config.strip_prefix_multi, derived().strip_prefix_multi);
    }

    #[test]
    fn test_overrides_take_final_precedence() {
        let options = PluginOptions {
            import_scripts: vec![ImportScript::literal("unresolved.js")],
            ..PluginOptions::default()
        };
        let config = GeneratorConfig::resolve(&options, &derived(), &overrides());

        assert_eq!(config.import_scripts, vec!["/assets/sw-extra.js"]);
    }

    #[test]
    fn test_payload_has_no_integration_keys() {
        let options = PluginOptions {
            filename: Some("sw.js".into()),
            filepath: Some("/tmp/sw.js".into()),
            minify: true,
            force_delete: true,
            merge_statics_config: true,
            ..PluginOptions::default()
        };
        let config = GeneratorConfig::resolve(&options, &derived(), &overrides());
        let json = serde_json::to_value(&config).unwrap();
        let object = json.as_object().unwrap();

        for key in PluginOptions::INTEGRATION_KEYS {
            if *key == "staticFileGlobs" {
                // Present, but as the derived list rather than the user option
                continue;
            }
            assert!(!object.contains_key(*key), "leaked {key}");
        }
        assert_eq!(object["staticFileGlobs"], serde_json::json!(["/out/main.js"]));
    }
}
