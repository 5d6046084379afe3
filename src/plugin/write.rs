//! Scoped delete-then-write of the worker file.
//!
//! The new content goes to a sibling temp file first, so a failed write never
//! touches the previous worker and readers never see a partial file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::debug;
use crate::utils::path::absolute_lexical;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {0}")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("refusing to delete {path} outside {scope} (set forceDelete to allow)")]
    OutOfScope { path: PathBuf, scope: PathBuf },

    #[error("refusing to delete write-protected {0} (set forceDelete to allow)")]
    ReadOnly(PathBuf),

    #[error("failed to delete {0}")]
    Delete(PathBuf, #[source] std::io::Error),

    #[error("failed to write {0}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Replace `target` with `content`.
///
/// An existing target is deleted only when it lies inside `scope` and is not
/// write-protected, unless `force` is set.
pub async fn write_replacing(
    target: &Path,
    content: &str,
    scope: &Path,
    force: bool,
) -> Result<(), WriteError> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|err| WriteError::CreateDir(parent.to_path_buf(), err))?;
    }

    let temp = temp_path(target);
    if let Err(err) = fs::write(&temp, content).await {
        let _ = fs::remove_file(&temp).await;
        return Err(WriteError::Write(target.to_path_buf(), err));
    }

    let replaced = async {
        remove_existing(target, scope, force).await?;
        fs::rename(&temp, target)
            .await
            .map_err(|err| WriteError::Write(target.to_path_buf(), err))
    }
    .await;

    if replaced.is_err() {
        let _ = fs::remove_file(&temp).await;
    }
    replaced
}

/// Delete a previous worker file, honoring scope and write protection.
async fn remove_existing(target: &Path, scope: &Path, force: bool) -> Result<(), WriteError> {
    let metadata = match fs::symlink_metadata(target).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(WriteError::Delete(target.to_path_buf(), err)),
    };

    if !force {
        if !absolute_lexical(target).starts_with(absolute_lexical(scope)) {
            return Err(WriteError::OutOfScope {
                path: target.to_path_buf(),
                scope: scope.to_path_buf(),
            });
        }
        if metadata.permissions().readonly() {
            return Err(WriteError::ReadOnly(target.to_path_buf()));
        }
    } else if metadata.permissions().readonly() {
        let mut permissions = metadata.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(target, permissions)
            .await
            .map_err(|err| WriteError::Delete(target.to_path_buf(), err))?;
    }

    debug!("precache"; "deleting previous {}", target.display());
    fs::remove_file(target)
        .await
        .map_err(|err| WriteError::Delete(target.to_path_buf(), err))
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
