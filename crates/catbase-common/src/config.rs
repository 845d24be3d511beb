//! Launcher configuration assembled from the process environment,
//! command-line flags, and the build-time deployment root.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants;

/// Everything the launcher needs to know before resolving paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Environment root (`CONDA_PREFIX`), required by the resolver.
    pub env_root: Option<PathBuf>,
    /// Deployment root baked in at build time.
    pub deploy_root: Option<PathBuf>,
    /// Optional Tomcat home override (`CATALINA_HOME`).
    pub catalina_home: Option<PathBuf>,
    /// Optional parent for auto-created state directories (`XDG_RUNTIME_DIR`).
    pub runtime_dir: Option<PathBuf>,
    /// Search path used after the environment root (`PATH`).
    pub search_path: Option<OsString>,
    /// Caller-supplied persistent state directory (`--state-dir`).
    pub state_dir: Option<PathBuf>,
    /// Keep an auto-created state directory after exit (`--keep`).
    pub keep: bool,
}

impl LauncherConfig {
    /// Reads the environment-derived settings from the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            env_root: get(constants::ENV_ROOT_VAR).map(PathBuf::from),
            catalina_home: get(constants::CATALINA_HOME_VAR).map(PathBuf::from),
            runtime_dir: get(constants::RUNTIME_DIR_VAR).map(PathBuf::from),
            search_path: get(constants::SEARCH_PATH_VAR),
            ..Self::default()
        }
    }

    /// Sets the deployment root. Blank values are ignored.
    #[must_use]
    pub fn with_deploy_root(mut self, deploy_root: Option<&str>) -> Self {
        self.deploy_root = deploy_root.filter(|s| !s.is_empty()).map(PathBuf::from);
        self
    }

    /// Applies the `--state-dir` and `--keep` flags.
    #[must_use]
    pub fn with_state(mut self, state_dir: Option<PathBuf>, keep: bool) -> Self {
        self.state_dir = state_dir;
        self.keep = keep;
        self
    }

    /// Parent directory for auto-created state directories.
    ///
    /// Prefers the runtime directory hint when it names an existing
    /// directory, otherwise the system temp directory.
    #[must_use]
    pub fn runtime_parent(&self) -> PathBuf {
        self.runtime_dir
            .as_deref()
            .filter(|p| p.is_dir())
            .map_or_else(std::env::temp_dir, Path::to_path_buf)
    }
}
