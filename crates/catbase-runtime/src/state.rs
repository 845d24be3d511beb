//! Mutable state directory management.
//!
//! A [`StateDir`] owns one `CATALINA_BASE` tree. Caller-supplied
//! directories persist; auto-created ones are removed when the guard is
//! dropped unless retention was requested. Signal-driven exits are
//! covered separately by [`crate::cleanup`].

use std::path::{Path, PathBuf};

use catbase_common::constants;
use catbase_common::error::{LauncherError, Result};

use crate::filesystem::{copy_tree, entry_exists};

/// How long a state directory outlives the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Supplied with `--state-dir`; never deleted.
    Persistent,
    /// Auto-created and kept because of `--keep`.
    Retained,
    /// Auto-created and removed on exit.
    Ephemeral,
}

/// Guard over one state directory and its `catalina-base` subtree.
#[derive(Debug)]
pub struct StateDir {
    root: PathBuf,
    lifetime: Lifetime,
}

impl StateDir {
    /// Uses `requested` when given, otherwise creates a unique directory
    /// under `runtime_parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn acquire(requested: Option<&Path>, runtime_parent: &Path, keep: bool) -> Result<Self> {
        match requested {
            Some(path) => Self::persistent(path),
            None => Self::create_unique(runtime_parent, keep),
        }
    }

    /// Opens (creating if needed) a caller-supplied directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or canonicalised.
    pub fn persistent(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path).map_err(|e| LauncherError::io(path, e))?;
        let root = std::fs::canonicalize(path).map_err(|e| LauncherError::io(path, e))?;
        tracing::info!(path = %root.display(), "using persistent state directory");
        Ok(Self {
            root,
            lifetime: Lifetime::Persistent,
        })
    }

    /// Creates a fresh `tomcat-<random>` directory under `parent`.
    ///
    /// Uses `create_dir`, so an existing name is never reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is unusable or every attempted name
    /// collides.
    pub fn create_unique(parent: &Path, keep: bool) -> Result<Self> {
        let lifetime = if keep {
            Lifetime::Retained
        } else {
            Lifetime::Ephemeral
        };

        let mut last_err = None;
        for _ in 0..constants::STATE_DIR_ATTEMPTS {
            let candidate = parent.join(unique_name());
            match std::fs::create_dir(&candidate) {
                Ok(()) => {
                    let root = std::fs::canonicalize(&candidate)
                        .map_err(|e| LauncherError::io(&candidate, e))?;
                    tracing::info!(path = %root.display(), ?lifetime, "created state directory");
                    return Ok(Self { root, lifetime });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %candidate.display(), "state directory name taken");
                    last_err = Some(e);
                }
                Err(e) => return Err(LauncherError::io(&candidate, e)),
            }
        }
        Err(LauncherError::io(
            parent,
            last_err.unwrap_or_else(|| std::io::Error::other("no state directory attempts made")),
        ))
    }

    /// Creates `catalina-base/{conf,logs,temp,work,webapps}`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_layout(&self) -> Result<()> {
        let base = self.base();
        for sub in constants::BASE_SUBDIRS {
            let dir = base.join(sub);
            std::fs::create_dir_all(&dir).map_err(|e| LauncherError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Copies `<catalina_home>/conf` into the instance unless the instance
    /// already has a `server.xml`.
    ///
    /// Returns `true` when seeding happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub fn seed_conf(&self, catalina_home: &Path) -> Result<bool> {
        let conf = self.conf();
        if entry_exists(&conf.join(constants::SERVER_XML)) {
            tracing::debug!(conf = %conf.display(), "conf already seeded");
            return Ok(false);
        }
        let source = catalina_home.join(constants::CONF_DIR);
        copy_tree(&source, &conf)?;
        tracing::info!(from = %source.display(), to = %conf.display(), "seeded instance conf");
        Ok(true)
    }

    /// Top-level state directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lifetime of this directory.
    #[must_use]
    pub const fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Whether the directory is removed when the guard drops.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.lifetime == Lifetime::Ephemeral
    }

    /// `CATALINA_BASE`.
    #[must_use]
    pub fn base(&self) -> PathBuf {
        self.root.join(constants::CATALINA_BASE_DIR)
    }

    /// Instance configuration directory.
    #[must_use]
    pub fn conf(&self) -> PathBuf {
        self.base().join(constants::CONF_DIR)
    }

    /// Instance log directory.
    #[must_use]
    pub fn logs(&self) -> PathBuf {
        self.base().join(constants::LOGS_DIR)
    }

    /// `CATALINA_TMPDIR`.
    #[must_use]
    pub fn temp(&self) -> PathBuf {
        self.base().join(constants::TEMP_DIR)
    }

    /// Mutable webapps directory.
    #[must_use]
    pub fn webapps(&self) -> PathBuf {
        self.base().join(constants::WEBAPPS_DIR)
    }

    /// `CATALINA_OUT`.
    #[must_use]
    pub fn catalina_out(&self) -> PathBuf {
        self.logs().join(constants::CATALINA_OUT)
    }

    /// `CATALINA_PID`.
    #[must_use]
    pub fn pid_file(&self) -> PathBuf {
        self.base().join(constants::PID_FILE)
    }
}

impl Drop for StateDir {
    fn drop(&mut self) {
        if !self.is_ephemeral() {
            return;
        }
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => tracing::debug!(path = %self.root.display(), "removed state directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.root.display(),
                error = %e,
                "failed to remove state directory"
            ),
        }
    }
}

fn unique_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        constants::STATE_DIR_PREFIX,
        &id[..constants::STATE_DIR_SUFFIX_LEN]
    )
}
