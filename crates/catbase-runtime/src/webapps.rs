//! Populates the instance `webapps` directory from the deployment root.
//!
//! Each top-level entry is symlinked into place, or copied when the
//! filesystem refuses the symlink. Existing destination entries always
//! win, so local replacements survive repeated setups.

use std::path::Path;

use catbase_common::error::{LauncherError, Result};

use crate::filesystem::{copy_tree, entry_exists};

/// Names handled by one [`populate`] call, grouped by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Entries created as symlinks.
    pub linked: Vec<String>,
    /// Entries copied because the symlink could not be created.
    pub copied: Vec<String>,
    /// Entries left alone because the destination already existed.
    pub skipped: Vec<String>,
}

impl PopulateReport {
    /// Total number of entries seen in the source directory.
    #[must_use]
    pub fn total(&self) -> usize {
        self.linked.len() + self.copied.len() + self.skipped.len()
    }
}

/// Links every entry of `source` into `dest`.
///
/// A missing `source` only produces a warning; the instance then starts
/// without applications.
///
/// # Errors
///
/// Returns an error if `source` cannot be listed or a fallback copy fails.
pub fn populate(source: &Path, dest: &Path) -> Result<PopulateReport> {
    populate_with(source, dest, |from, to| std::os::unix::fs::symlink(from, to))
}

/// Like [`populate`], with the link operation supplied by the caller.
///
/// # Errors
///
/// Returns an error if `source` cannot be listed or a fallback copy fails.
pub fn populate_with<F>(source: &Path, dest: &Path, link: F) -> Result<PopulateReport>
where
    F: Fn(&Path, &Path) -> std::io::Result<()>,
{
    let mut report = PopulateReport::default();
    if !source.is_dir() {
        tracing::warn!(
            source = %source.display(),
            "deployment webapps directory is missing; starting without applications"
        );
        return Ok(report);
    }

    let mut entries = std::fs::read_dir(source)
        .map_err(|e| LauncherError::io(source, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| LauncherError::io(source, e))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name();
        let label = name.to_string_lossy().into_owned();
        let from = entry.path();
        let to = dest.join(&name);

        if entry_exists(&to) {
            tracing::debug!(entry = %label, "webapp already present; keeping it");
            report.skipped.push(label);
            continue;
        }

        match link(&from, &to) {
            Ok(()) => {
                tracing::debug!(entry = %label, "linked webapp");
                report.linked.push(label);
            }
            Err(e) => {
                tracing::debug!(entry = %label, error = %e, "symlink refused; copying webapp");
                copy_tree(&from, &to)?;
                report.copied.push(label);
            }
        }
    }

    tracing::info!(
        linked = report.linked.len(),
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        "webapps populated"
    );
    Ok(report)
}
