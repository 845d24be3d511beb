//! Small filesystem helpers shared by the resolver and the state manager.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use catbase_common::error::{LauncherError, Result};

/// Returns whether `path` is a regular file with any execute bit set.
///
/// Symlinks are followed.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

/// Returns whether anything, including a dangling symlink, exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Recursively copies `src` into `dst`.
///
/// Directories are merged into any existing destination; files are
/// overwritten. Symlinks are followed, so the copy holds real content.
///
/// # Errors
///
/// Returns an error if any entry cannot be read or written.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let meta = std::fs::metadata(src).map_err(|e| LauncherError::io(src, e))?;
    if !meta.is_dir() {
        let _ = std::fs::copy(src, dst).map_err(|e| LauncherError::io(dst, e))?;
        return Ok(());
    }

    std::fs::create_dir_all(dst).map_err(|e| LauncherError::io(dst, e))?;
    let entries = std::fs::read_dir(src).map_err(|e| LauncherError::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LauncherError::io(src, e))?;
        copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
    }
    Ok(())
}
