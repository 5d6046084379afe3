//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/app/web/src/    ← cwd
/// /home/user/app/precache.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Expand a leading `~` in a configured path.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) if raw.starts_with('~') => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_file_absolute_missing() {
        assert_eq!(find_config_file(Path::new("/definitely/not/here.toml")), None);
    }

    #[test]
    fn test_find_config_file_absolute_existing() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("precache.toml");
        std::fs::write(&file, "").unwrap();
        assert_eq!(find_config_file(&file), Some(file));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("dist/sw.js")), PathBuf::from("dist/sw.js"));
    }

    #[test]
    fn test_expand_tilde_expands_home() {
        let expanded = expand_tilde(Path::new("~/sw.js"));
        assert!(expanded.ends_with("sw.js"));
    }
}
