//! Path normalization utilities.
//!
//! Provides consistent path handling across the plugin:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `normalize_lexical` - pure `.`/`..` resolution without touching the disk
//! - `absolute_lexical` - absolute form without touching the disk
//! - `join_normalized` - output dir + asset name, as a manifest entry string

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// Emitted assets are described by name before anything is read back, so the
/// result must not depend on whether the file exists yet.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Anchor a path at the current directory, then resolve `.`/`..` lexically.
///
/// `""`, `"."` and `"dist"` all end up absolute, so prefixes and scope checks
/// compare like with like.
pub fn absolute_lexical(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_lexical(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_lexical(&cwd.join(path)),
        Err(_) => normalize_lexical(path),
    }
}

/// Join an emitted asset name onto the output directory.
///
/// Asset names use `/` regardless of platform; the result uses the native separator.
pub fn join_normalized(dir: &Path, name: &str) -> String {
    let mut joined = dir.to_path_buf();
    for part in name.split('/').filter(|p| !p.is_empty()) {
        joined.push(part);
    }
    path_to_string(&normalize_lexical(&joined))
}

/// Directory path as a prefix string ending in the native separator.
///
/// `/out` → `/out/`, `/out/` → `/out/`.
pub fn dir_prefix(dir: &Path) -> String {
    let mut prefix = path_to_string(&normalize_lexical(dir));
    if !prefix.ends_with(MAIN_SEPARATOR) {
        prefix.push(MAIN_SEPARATOR);
    }
    prefix
}

/// Lossy string form of a path.
#[inline]
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_lexical() {
        assert_eq!(
            normalize_lexical(Path::new("/out/./js/../main.js")),
            PathBuf::from("/out/main.js")
        );
        assert_eq!(normalize_lexical(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexical(Path::new("../a/b/..")), PathBuf::from("../a"));
        assert_eq!(normalize_lexical(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_absolute_lexical_anchors_relative_dirs() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_lexical(Path::new("")), cwd);
        assert_eq!(absolute_lexical(Path::new(".")), cwd);
        assert_eq!(absolute_lexical(Path::new("./dist/")), cwd.join("dist"));
        assert_eq!(absolute_lexical(Path::new("dist/../out")), cwd.join("out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_lexical_keeps_absolute_paths() {
        assert_eq!(absolute_lexical(Path::new("/out/./a/..")), PathBuf::from("/out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_join_normalized() {
        assert_eq!(join_normalized(Path::new("/out"), "main.js"), "/out/main.js");
        assert_eq!(
            join_normalized(Path::new("/out/"), "js/app.1a2b.js"),
            "/out/js/app.1a2b.js"
        );
        assert_eq!(join_normalized(Path::new("/out"), "./a/../b.css"), "/out/b.css");
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_prefix() {
        assert_eq!(dir_prefix(Path::new("/out")), "/out/");
        assert_eq!(dir_prefix(Path::new("/out/")), "/out/");
        assert_eq!(dir_prefix(Path::new("/out/./dist/..")), "/out/");
    }
}
