//! Signal handling for auto-created state directories.
//!
//! [`crate::state::StateDir`] removes ephemeral trees when it drops, but
//! SIGINT, SIGTERM, and SIGHUP terminate the process without unwinding.
//! [`SignalCleanup`] covers those paths. While a `catalina.sh` child is
//! attached, the signal goes to the child instead and the launcher keeps
//! waiting, so the tree outlives the child's own shutdown.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catbase_common::constants;
use catbase_common::error::{LauncherError, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// No child attached.
const IDLE: i32 = 0;
/// A child is being spawned and its PID is not known yet.
const SPAWNING: i32 = -1;
/// A signal arrived while a child was being spawned.
const SPAWN_SIGNALLED: i32 = -2;

/// What one delivered signal resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// SIGTERM was sent to the attached child with this PID.
    Forwarded(i32),
    /// Recorded for a child or directory that is not known yet.
    Deferred,
    /// The armed directory was removed; the process should exit.
    Exit,
}

#[derive(Debug, Default)]
struct Shared {
    root: Mutex<Option<PathBuf>>,
    child: AtomicI32,
    interrupted: AtomicBool,
}

impl Shared {
    fn root(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Signal policy for one launcher invocation.
///
/// Clones share state with the handler installed by [`Self::install`].
#[derive(Debug, Clone, Default)]
pub struct SignalCleanup {
    shared: Arc<Shared>,
}

impl SignalCleanup {
    /// Creates a policy with no directory armed and no child attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the process-wide handler for SIGINT, SIGTERM, and SIGHUP.
    ///
    /// Can be installed once per process. When a signal finds no child
    /// attached, the handler removes the armed directory and exits with
    /// status 130.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already installed or the signal
    /// handler cannot be registered.
    pub fn install(&self) -> Result<()> {
        let policy = self.clone();
        ctrlc::set_handler(move || {
            if policy.handle_signal() == SignalOutcome::Exit {
                std::process::exit(i32::from(constants::SIGNAL_EXIT_CODE));
            }
        })
        .map_err(|e| LauncherError::config(format!("failed to install signal handler: {e}")))?;
        tracing::debug!("signal cleanup handler installed");
        Ok(())
    }

    /// Registers the directory removed when a signal finds no child.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Interrupted`] if a signal already arrived.
    /// The directory is left to the caller's guard in that case.
    pub fn arm(&self, root: &Path) -> Result<()> {
        *self.shared.root() = Some(root.to_path_buf());
        if self.interrupted() {
            return Err(LauncherError::Interrupted);
        }
        Ok(())
    }

    /// Whether any termination signal has arrived.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.shared.interrupted.load(Ordering::SeqCst)
    }

    /// Marks a child as about to be spawned.
    ///
    /// A signal that arrives before [`ChildSlot::attach`] is replayed to
    /// the child once its PID is known.
    #[must_use]
    pub fn begin_child(&self) -> ChildSlot<'_> {
        self.shared.child.store(SPAWNING, Ordering::SeqCst);
        ChildSlot {
            shared: &self.shared,
        }
    }

    /// Applies the policy to one termination signal.
    ///
    /// This is what the installed handler runs; it never exits by itself.
    #[must_use]
    pub fn handle_signal(&self) -> SignalOutcome {
        self.shared.interrupted.store(true, Ordering::SeqCst);
        let mut current = self.shared.child.load(Ordering::SeqCst);
        loop {
            match current {
                pid if pid > 0 => {
                    forward(pid);
                    return SignalOutcome::Forwarded(pid);
                }
                SPAWNING => {
                    match self.shared.child.compare_exchange(
                        SPAWNING,
                        SPAWN_SIGNALLED,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    ) {
                        Ok(_) => return SignalOutcome::Deferred,
                        Err(actual) => current = actual,
                    }
                }
                SPAWN_SIGNALLED => return SignalOutcome::Deferred,
                _ => {
                    return match self.shared.root().as_deref() {
                        Some(root) => {
                            remove_tree(root);
                            SignalOutcome::Exit
                        }
                        None => SignalOutcome::Deferred,
                    };
                }
            }
        }
    }
}

/// One spawned child tracked by [`SignalCleanup`]. Detaches on drop.
#[derive(Debug)]
pub struct ChildSlot<'a> {
    shared: &'a Shared,
}

impl ChildSlot<'_> {
    /// Records the child's PID, forwarding a signal that arrived during spawn.
    pub fn attach(&self, pid: u32) {
        let Ok(pid) = i32::try_from(pid) else {
            return;
        };
        if self.shared.child.swap(pid, Ordering::SeqCst) == SPAWN_SIGNALLED {
            forward(pid);
        }
    }
}

impl Drop for ChildSlot<'_> {
    fn drop(&mut self) {
        self.shared.child.store(IDLE, Ordering::SeqCst);
    }
}

fn forward(pid: i32) {
    match kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => tracing::info!(pid, "forwarded termination signal to catalina.sh"),
        Err(e) => tracing::debug!(pid, error = %e, "could not forward termination signal"),
    }
}

/// Removes `root`, logging instead of failing.
pub fn remove_tree(root: &Path) {
    match std::fs::remove_dir_all(root) {
        Ok(()) => tracing::debug!(path = %root.display(), "removed state directory after signal"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %root.display(), error = %e, "failed to remove state directory"),
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::process::ExitStatusExt;
    use std::process::{Child, Command};

    use super::*;

    fn armed_tree() -> (tempfile::TempDir, PathBuf) {
        let parent = tempfile::tempdir().expect("tempdir");
        let root = parent.path().join("tomcat-abc");
        std::fs::create_dir_all(root.join("catalina-base/logs")).expect("mkdir");
        (parent, root)
    }

    fn sleeper() -> Child {
        Command::new("sleep").arg("30").spawn().expect("spawn sleep")
    }

    #[test]
    fn signal_without_child_removes_armed_tree() {
        let (_parent, root) = armed_tree();
        let signals = SignalCleanup::new();
        signals.arm(&root).expect("arm");

        assert_eq!(signals.handle_signal(), SignalOutcome::Exit);
        assert!(!root.exists());
        assert!(signals.interrupted());
    }

    #[test]
    fn signal_before_arm_is_reported_by_arm() {
        let (_parent, root) = armed_tree();
        let signals = SignalCleanup::new();

        assert_eq!(signals.handle_signal(), SignalOutcome::Deferred);
        let err = signals.arm(&root).expect_err("already interrupted");
        assert!(matches!(err, LauncherError::Interrupted));
        assert!(root.exists());
    }

    #[test]
    fn signal_goes_to_attached_child_and_keeps_tree() {
        let (_parent, root) = armed_tree();
        let signals = SignalCleanup::new();
        signals.arm(&root).expect("arm");

        let mut child = sleeper();
        let slot = signals.begin_child();
        slot.attach(child.id());
        let pid = i32::try_from(child.id()).expect("pid fits i32");

        assert_eq!(signals.handle_signal(), SignalOutcome::Forwarded(pid));
        let status = child.wait().expect("wait");
        assert_eq!(status.signal(), Some(nix::libc::SIGTERM));
        assert!(root.exists());
        drop(slot);
    }

    #[test]
    fn signal_during_spawn_is_replayed_on_attach() {
        let signals = SignalCleanup::new();
        let slot = signals.begin_child();
        assert_eq!(signals.handle_signal(), SignalOutcome::Deferred);

        let mut child = sleeper();
        slot.attach(child.id());
        let status = child.wait().expect("wait");
        assert_eq!(status.signal(), Some(nix::libc::SIGTERM));
    }

    #[test]
    fn dropping_slot_detaches_child() {
        let (_parent, root) = armed_tree();
        let signals = SignalCleanup::new();
        signals.arm(&root).expect("arm");
        {
            let slot = signals.begin_child();
            slot.attach(u32::MAX);
        }
        assert_eq!(signals.handle_signal(), SignalOutcome::Exit);
    }

    #[test]
    fn remove_tree_deletes_nested_content() {
        let (_parent, root) = armed_tree();
        std::fs::write(root.join("catalina-base/logs/catalina.out"), "log").expect("write");

        remove_tree(&root);
        assert!(!root.exists());
    }

    #[test]
    fn remove_tree_tolerates_missing_directory() {
        let parent = tempfile::tempdir().expect("tempdir");
        remove_tree(&parent.path().join("never-created"));
    }
}
