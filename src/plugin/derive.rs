//! File list and prefix mapping for one build cycle.

use std::collections::BTreeMap;

use crate::config::{DerivedState, PluginConfig};
use crate::debug;
use crate::pipeline::Compilation;
use crate::utils::path::{absolute_lexical, dir_prefix, join_normalized};

/// Compute the derived state from the compilation and static configuration.
///
/// Pure for a given working directory: a relative output path is anchored there.
pub fn derive(config: &PluginConfig, compilation: &Compilation) -> DerivedState {
    let output_dir = absolute_lexical(&compilation.output_path);
    let options = config.options();

    let candidates: Vec<String> = compilation
        .assets
        .iter()
        .map(|asset| join_normalized(&output_dir, asset))
        .collect();

    let files = match &options.static_file_globs {
        Some(user) if config.merge_statics() => {
            candidates.into_iter().chain(user.iter().cloned()).collect()
        }
        Some(user) => user.clone(),
        None => candidates,
    };

    let static_file_globs: Vec<String> = files
        .into_iter()
        .filter(|file| !config.ignore_patterns().iter().any(|re| re.is_match(file)))
        .collect();

    let mut strip_prefix_multi =
        BTreeMap::from([(dir_prefix(&output_dir), compilation.public_path.clone())]);
    if config.merge_statics() {
        strip_prefix_multi.extend(
            options
                .strip_prefix_multi
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    } else if !options.strip_prefix_multi.is_empty() {
        debug!("precache"; "stripPrefixMulti replaced by derived mapping (mergeStaticsConfig is off)");
    }

    DerivedState {
        assets: compilation.assets.clone(),
        output_dir,
        public_path: compilation.public_path.clone(),
        static_file_globs,
        strip_prefix_multi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginOptions;
    use std::path::PathBuf;

    fn config(options: PluginOptions) -> PluginConfig {
        PluginConfig::new(options).unwrap()
    }

    fn compilation() -> Compilation {
        Compilation::new("/out", "http://host/assets/")
            .with_assets(["main.js", "main.js.map", "./css/../app.css"])
    }

    #[cfg(unix)]
    #[test]
    fn test_single_asset_mapping() {
        let compilation = Compilation::new("/out", "http://host/assets/").with_assets(["main.js"]);
        let derived = derive(&config(PluginOptions::default()), &compilation);

        assert_eq!(derived.static_file_globs, vec!["/out/main.js"]);
        assert_eq!(
            derived.strip_prefix_multi,
            BTreeMap::from([("/out/".to_string(), "http://host/assets/".to_string())])
        );
        assert_eq!(derived.output_dir, PathBuf::from("/out"));
        assert_eq!(derived.assets, vec!["main.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_assets_are_normalized() {
        let derived = derive(&config(PluginOptions::default()), &compilation());
        assert_eq!(
            derived.static_file_globs,
            vec!["/out/main.js", "/out/main.js.map", "/out/app.css"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_ignore_patterns_filter_in_order() {
        let options = PluginOptions {
            static_file_globs_ignore_patterns: vec![r"\.map$".into(), r"\.css$".into()],
            ..PluginOptions::default()
        };
        let derived = derive(&config(options), &compilation());
        assert_eq!(derived.static_file_globs, vec!["/out/main.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_user_globs_replace_by_default() {
        let options = PluginOptions {
            static_file_globs: Some(vec!["/public/**/*.html".into()]),
            ..PluginOptions::default()
        };
        let derived = derive(&config(options), &compilation());
        assert_eq!(derived.static_file_globs, vec!["/public/**/*.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_user_globs_append_in_merge_mode() {
        let options = PluginOptions {
            static_file_globs: Some(vec!["/public/**/*.html".into()]),
            static_file_globs_ignore_patterns: vec![r"\.map$".into()],
            merge_statics_config: true,
            ..PluginOptions::default()
        };
        let derived = derive(&config(options), &compilation());
        assert_eq!(
            derived.static_file_globs,
            vec!["/out/main.js", "/out/app.css", "/public/**/*.html"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_strip_prefix_multi_merge_and_replace() {
        let user = BTreeMap::from([
            ("/public/".to_string(), "/".to_string()),
            ("/out/".to_string(), "/override/".to_string()),
        ]);

        let replace = derive(
            &config(PluginOptions {
                strip_prefix_multi: user.clone(),
                ..PluginOptions::default()
            }),
            &compilation(),
        );
        assert_eq!(
            replace.strip_prefix_multi,
            BTreeMap::from([("/out/".to_string(), "http://host/assets/".to_string())])
        );

        let merged = derive(
            &config(PluginOptions {
                strip_prefix_multi: user,
                merge_statics_config: true,
                ..PluginOptions::default()
            }),
            &compilation(),
        );
        assert_eq!(
            merged.strip_prefix_multi,
            BTreeMap::from([
                ("/out/".to_string(), "/override/".to_string()),
                ("/public/".to_string(), "/".to_string()),
            ])
        );
    }

    #[test]
    fn test_relative_output_dirs_are_anchored() {
        let cwd = std::env::current_dir().unwrap();
        for (output, dir) in [("", cwd.clone()), (".", cwd.clone()), ("dist", cwd.join("dist"))] {
            let compilation = Compilation::new(output, "/assets/").with_assets(["main.js"]);
            let derived = derive(&config(PluginOptions::default()), &compilation);

            let file = dir.join("main.js").to_string_lossy().into_owned();
            let prefix = dir_prefix(&dir);
            assert!(file.starts_with(&prefix), "{file} vs {prefix}");
            assert_eq!(derived.static_file_globs, vec![file]);
            assert_eq!(
                derived.strip_prefix_multi,
                BTreeMap::from([(prefix, "/assets/".to_string())])
            );
            assert_eq!(derived.output_dir, dir);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_public_path_maps_to_empty_prefix() {
        let compilation = Compilation::new("/out", "").with_assets(["js/main.js"]);
        let derived = derive(&config(PluginOptions::default()), &compilation);
        assert_eq!(
            derived.strip_prefix_multi,
            BTreeMap::from([("/out/".to_string(), String::new())])
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let config = config(PluginOptions {
            static_file_globs_ignore_patterns: vec![r"\.map$".into()],
            ..PluginOptions::default()
        });
        assert_eq!(derive(&config, &compilation()), derive(&config, &compilation()));
    }
}
