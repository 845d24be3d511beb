//! Best-effort liveness check against the PID record.
//!
//! The record belongs to `catalina.sh`; catbase only reads it. A PID that
//! was recycled by an unrelated process still reads as running.

use std::path::Path;

use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Outcome of probing a PID record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidStatus {
    /// The recorded process accepts signal 0.
    Running(i32),
    /// No usable record, or the recorded process is not reachable.
    NotRunning(Option<i32>),
}

impl PidStatus {
    /// Whether the instance counts as running.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// The PID read from the record, if any.
    #[must_use]
    pub const fn pid(self) -> Option<i32> {
        match self {
            Self::Running(pid) => Some(pid),
            Self::NotRunning(pid) => pid,
        }
    }
}

/// Reads a positive PID from `path`.
///
/// Missing, empty, non-numeric, and non-positive records all yield `None`.
#[must_use]
pub fn read_pid(path: &Path) -> Option<i32> {
    let content = std::fs::read_to_string(path).ok()?;
    content.trim().parse::<i32>().ok().filter(|pid| *pid > 0)
}

/// Returns whether `pid` can be sent signal 0.
#[must_use]
pub fn is_alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

/// Reads the record at `path` and checks whether its process is alive.
#[must_use]
pub fn probe(path: &Path) -> PidStatus {
    match read_pid(path) {
        Some(pid) if is_alive(pid) => PidStatus::Running(pid),
        pid => {
            tracing::debug!(path = %path.display(), ?pid, "no live process behind PID record");
            PidStatus::NotRunning(pid)
        }
    }
}
