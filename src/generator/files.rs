//! `staticFileGlobs` expansion.
//!
//! A pattern without glob metacharacters names one file and is kept only if
//! that file exists. A glob is split at its first wildcard component: the
//! literal part becomes the walk root, the rest an anchored override glob.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use rustc_hash::FxHashSet;

use super::GenerationError;
use crate::utils::path::normalize_lexical;

/// Expand patterns into existing files.
///
/// Order follows the pattern list; files matched by one glob are sorted by
/// path; a file matched twice keeps its first position.
pub fn expand(patterns: &[String]) -> Result<Vec<PathBuf>, GenerationError> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();

    for pattern in patterns {
        for file in expand_one(pattern)? {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

fn expand_one(pattern: &str) -> Result<Vec<PathBuf>, GenerationError> {
    let (base, rest) = split_glob(pattern);

    let Some(rest) = rest else {
        let path = normalize_lexical(&base);
        return Ok(if path.is_file() { vec![path] } else { Vec::new() });
    };

    if !base.is_dir() {
        return Err(GenerationError::Io(
            base,
            std::io::Error::new(std::io::ErrorKind::NotFound, "glob base is not a directory"),
        ));
    }

    let mut overrides = OverrideBuilder::new(&base);
    overrides
        .add(&format!("/{rest}"))
        .map_err(|source| GenerationError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
    let overrides = overrides.build().map_err(|source| GenerationError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    let walker = WalkBuilder::new(&base)
        .standard_filters(false)
        .overrides(overrides)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|err| GenerationError::Walk(base.clone(), err))?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(normalize_lexical(entry.path()));
        }
    }

    Ok(files)
}

/// Split a pattern into its literal base directory and the glob remainder.
///
/// `dist/**/*.js` → (`dist`, `**/*.js`), `dist/app.js` → (`dist/app.js`, None).
fn split_glob(pattern: &str) -> (PathBuf, Option<String>) {
    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    let mut components = path.components();

    while let Some(component) = components.next() {
        if let Component::Normal(part) = component
            && is_glob(&part.to_string_lossy())
        {
            let rest: Vec<String> = std::iter::once(component)
                .chain(components)
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if base.as_os_str().is_empty() {
                base.push(".");
            }
            return (base, Some(rest.join("/")));
        }
        base.push(component.as_os_str());
    }

    (base, None)
}

fn is_glob(part: &str) -> bool {
    part.contains(['*', '?', '[', '{'])
}
