//! Per-build-cycle state.
//!
//! Both structs are rebuilt from scratch on every "assets finalized" event and
//! dropped when the next cycle starts; nothing here carries across builds.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Facts taken from the current compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedState {
    /// Emitted asset names, in emission order.
    pub assets: Vec<String>,
    /// Resolved output directory.
    pub output_dir: PathBuf,
    /// Public URL prefix (may be empty).
    pub public_path: String,
    /// Final file list after override/merge and ignore filtering.
    pub static_file_globs: Vec<String>,
    /// Local directory prefix → public URL prefix.
    pub strip_prefix_multi: BTreeMap<String, String>,
}

/// Values that beat static configuration for this cycle only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    /// `importScripts` with placeholders resolved and the public path applied.
    pub import_scripts: Vec<String>,
    /// Where the worker gets written.
    pub filepath: PathBuf,
}
