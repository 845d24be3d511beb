//! Environment resolution: locates Java, `catalina.sh`, and the Tomcat home.
//!
//! Every search is ordered and the first hit wins. Nothing here touches
//! the state directory, so a failed resolution leaves no trace on disk.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use catbase_common::config::LauncherConfig;
use catbase_common::constants;
use catbase_common::error::{LauncherError, Result};
use catbase_common::types::{JavaHome, RuntimeEnvironment};

use crate::filesystem::is_executable;

/// Resolves the full [`RuntimeEnvironment`] for one invocation.
///
/// # Errors
///
/// Returns [`LauncherError::Config`] when the environment root or the
/// deployment root is missing, or when the Tomcat home is malformed, and
/// [`LauncherError::DependencyNotFound`] when Java or `catalina.sh`
/// cannot be located.
pub fn resolve(config: &LauncherConfig) -> Result<RuntimeEnvironment> {
    let env_root = require_env_root(config.env_root.as_deref())?;
    let deploy_root = require_deploy_root(config.deploy_root.as_deref())?;
    let search_path = config.search_path.as_deref();

    let java = find_java(&env_root, search_path)?;
    let script = find_control_script(&env_root, config.catalina_home.as_deref(), search_path)?;
    let (control_script, catalina_home) = catalina_home_from_script(&script)?;
    let java_home = java_home_signal(&java, &env_root);

    tracing::info!(
        java = %java.display(),
        catalina_home = %catalina_home.display(),
        %java_home,
        "runtime environment resolved"
    );

    Ok(RuntimeEnvironment {
        env_root,
        deploy_root,
        java,
        java_home,
        catalina_home,
        control_script,
    })
}

/// Validates and canonicalises the environment root.
///
/// # Errors
///
/// Returns [`LauncherError::Config`] if the value is unset or the
/// directory does not exist.
pub fn require_env_root(env_root: Option<&Path>) -> Result<PathBuf> {
    let root = env_root.ok_or_else(|| {
        LauncherError::config(format!(
            "{} is not set; activate the environment that provides Java and Tomcat",
            constants::ENV_ROOT_VAR
        ))
    })?;
    std::fs::canonicalize(root).map_err(|e| {
        LauncherError::config(format!(
            "{} points at {}, which is not accessible: {e}",
            constants::ENV_ROOT_VAR,
            root.display()
        ))
    })
}

/// Validates the build-time deployment root.
///
/// Only the root itself is required; a missing `webapps/` is reported
/// later as a warning.
///
/// # Errors
///
/// Returns [`LauncherError::Config`] if the value was not set at build
/// time, is relative, or does not exist.
pub fn require_deploy_root(deploy_root: Option<&Path>) -> Result<PathBuf> {
    let root = deploy_root.ok_or_else(|| {
        LauncherError::config(format!(
            "deployment root was not set at build time ({})",
            constants::DEPLOY_ROOT_BUILD_VAR
        ))
    })?;
    if !root.is_absolute() {
        return Err(LauncherError::config(format!(
            "deployment root must be an absolute path, got {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(LauncherError::config(format!(
            "deployment root {} does not exist",
            root.display()
        )));
    }
    Ok(root.to_path_buf())
}

/// Locates the Java executable.
///
/// Checks `<env_root>/bin/java` first, then the search path. Warns when
/// the result lies outside the environment root.
///
/// # Errors
///
/// Returns [`LauncherError::DependencyNotFound`] if neither location
/// yields an executable.
pub fn find_java(env_root: &Path, search_path: Option<&OsStr>) -> Result<PathBuf> {
    let bundled = env_root.join("bin").join(constants::JAVA_BIN);
    let java = if is_executable(&bundled) {
        bundled
    } else {
        search_in_path(constants::JAVA_BIN, search_path).ok_or_else(|| {
            LauncherError::DependencyNotFound {
                kind: "java executable",
                searched: format!("{}, {}", bundled.display(), constants::SEARCH_PATH_VAR),
            }
        })?
    };

    if !is_within(&java, env_root) {
        tracing::warn!(
            java = %java.display(),
            env_root = %env_root.display(),
            "java resolved outside the environment root; a system installation may be used"
        );
    }
    Ok(java)
}

/// Locates `catalina.sh`.
///
/// Order: the `CATALINA_HOME` override, the candidate globs under the
/// environment root, then the search path.
///
/// # Errors
///
/// Returns [`LauncherError::DependencyNotFound`] if every strategy fails.
pub fn find_control_script(
    env_root: &Path,
    catalina_home: Option<&Path>,
    search_path: Option<&OsStr>,
) -> Result<PathBuf> {
    if let Some(home) = catalina_home {
        let script = home.join("bin").join(constants::CONTROL_SCRIPT);
        if is_executable(&script) {
            tracing::debug!(script = %script.display(), "using CATALINA_HOME override");
            return Ok(script);
        }
        tracing::warn!(
            catalina_home = %home.display(),
            "ignoring {}: no executable bin/{} found there",
            constants::CATALINA_HOME_VAR,
            constants::CONTROL_SCRIPT
        );
    }

    if let Some(script) = first_candidate(env_root, constants::CONTROL_SCRIPT_CANDIDATES) {
        return Ok(script);
    }

    search_in_path(constants::CONTROL_SCRIPT, search_path).ok_or_else(|| {
        LauncherError::DependencyNotFound {
            kind: "Tomcat control script",
            searched: format!(
                "{}, {} candidate locations under {}, {}",
                constants::CATALINA_HOME_VAR,
                constants::CONTROL_SCRIPT_CANDIDATES.len(),
                env_root.display(),
                constants::SEARCH_PATH_VAR
            ),
        }
    })
}

/// Evaluates glob `patterns` relative to `root` in list order and
/// returns the first executable match.
#[must_use]
pub fn first_candidate(root: &Path, patterns: &[&str]) -> Option<PathBuf> {
    let Some(root_str) = root.to_str() else {
        tracing::warn!(root = %root.display(), "environment root is not UTF-8; skipping candidate search");
        return None;
    };
    let escaped = glob::Pattern::escape(root_str);

    patterns.iter().find_map(|pattern| {
        let full = format!("{escaped}/{pattern}");
        match glob::glob(&full) {
            Ok(paths) => paths.filter_map(std::result::Result::ok).find(|p| is_executable(p)),
            Err(e) => {
                tracing::debug!(pattern = %full, error = %e, "skipping invalid candidate pattern");
                None
            }
        }
    })
}

/// Canonicalises the control script and derives the Tomcat home from it.
///
/// Returns `(canonical_script, catalina_home)`.
///
/// # Errors
///
/// Returns [`LauncherError::Io`] if the script cannot be canonicalised and
/// [`LauncherError::Config`] if the derived home lacks `conf/` or `bin/`.
pub fn catalina_home_from_script(script: &Path) -> Result<(PathBuf, PathBuf)> {
    let canonical = std::fs::canonicalize(script).map_err(|e| LauncherError::io(script, e))?;
    let home = canonical
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            LauncherError::config(format!(
                "cannot derive a Tomcat home from {}",
                canonical.display()
            ))
        })?;

    for sub in [constants::CONF_DIR, "bin"] {
        if !home.join(sub).is_dir() {
            return Err(LauncherError::config(format!(
                "Tomcat home {} has no {sub}/ directory",
                home.display()
            )));
        }
    }
    Ok((canonical, home))
}

/// Derives the Java home hint from the resolved executable.
///
/// The executable is resolved through symlinks and its grandparent is
/// taken as the guess. A guess holding `bin/java` is a JDK-style home;
/// otherwise the environment root is exported as `JRE_HOME`.
#[must_use]
pub fn java_home_signal(java: &Path, env_root: &Path) -> JavaHome {
    let guess = std::fs::canonicalize(java)
        .ok()
        .and_then(|real| real.parent().and_then(Path::parent).map(Path::to_path_buf));

    match guess {
        Some(home) if is_executable(&home.join("bin").join(constants::JAVA_BIN)) => {
            JavaHome::Jdk(home)
        }
        _ => JavaHome::Jre(env_root.to_path_buf()),
    }
}

fn search_in_path(binary: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let paths = search_path?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    which::which_in(binary, Some(paths), cwd).ok()
}

fn is_within(path: &Path, root: &Path) -> bool {
    if path.starts_with(root) {
        return true;
    }
    match (std::fs::canonicalize(path), std::fs::canonicalize(root)) {
        (Ok(p), Ok(r)) => p.starts_with(r),
        _ => false,
    }
}
