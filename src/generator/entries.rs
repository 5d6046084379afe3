//! Precache entries: file → URL mapping and content revisions.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{MAIN_SEPARATOR, Path};

use super::GenerationError;
use crate::utils::hash::{self, RevisionHasher};
use crate::utils::path::path_to_string;
use crate::utils::url::encode_path;

/// One `[url, revision]` pair in the worker's precache list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecacheEntry {
    pub url: String,
    pub revision: String,
}

/// Map a local file path to its public URL.
///
/// The longest `stripPrefixMulti` key that prefixes the path is replaced by
/// its value; the remainder is converted to `/` separators and percent-encoded.
/// A path no prefix matches keeps its own text.
pub fn url_for(path: &Path, strip_prefix_multi: &BTreeMap<String, String>) -> String {
    let path = path_to_string(path);

    let matched = strip_prefix_multi
        .iter()
        .filter(|(prefix, _)| !prefix.is_empty() && path.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len());

    match matched {
        Some((prefix, replacement)) => {
            format!("{replacement}{}", encode_path(&to_slash(&path[prefix.len()..])))
        }
        None => encode_path(&to_slash(&path)),
    }
}

fn to_slash(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}

/// Revision of one file's contents.
pub fn file_revision(path: &Path) -> Result<String, GenerationError> {
    let file = File::open(path).map_err(|err| GenerationError::Io(path.to_path_buf(), err))?;
    hash::revision_reader(file).map_err(|err| GenerationError::Io(path.to_path_buf(), err))
}

/// Revision over the concatenated contents of every dependency, in order.
pub fn dependencies_revision(dependencies: &[impl AsRef<Path>]) -> Result<String, GenerationError> {
    let mut hasher = RevisionHasher::new();
    for dependency in dependencies {
        let path = dependency.as_ref();
        let file = File::open(path).map_err(|err| GenerationError::Io(path.to_path_buf(), err))?;
        hasher
            .update_reader(file)
            .map_err(|err| GenerationError::Io(path.to_path_buf(), err))?;
    }
    Ok(hasher.finish())
}
