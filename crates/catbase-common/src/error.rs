//! Unified error type for the catbase workspace.
//!
//! Every failure the launcher can hit while resolving its environment,
//! preparing the state directory, or driving `catalina.sh` maps onto one
//! of these variants. Usage errors never reach this type: the argument
//! parser rejects them before any resolution happens.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required setting is missing or a path fails its structural checks.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// No search strategy located a required executable.
    #[error("{kind} not found (searched {searched})")]
    DependencyNotFound {
        /// Human-readable name of the missing dependency.
        kind: &'static str,
        /// Summary of the locations that were searched.
        searched: String,
    },

    /// The delegated control script reported failure.
    #[error("{} {mode} failed with {}", .program.display(), describe_code(.code))]
    ExternalProcess {
        /// Program that was invoked.
        program: PathBuf,
        /// Mode argument passed to the program.
        mode: String,
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// A termination signal arrived while the launcher was still working.
    #[error("interrupted by signal")]
    Interrupted,
}

impl LauncherError {
    /// Builds a [`LauncherError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`LauncherError::Config`] from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_owned(), |c| format!("exit code {c}"))
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LauncherError>;
