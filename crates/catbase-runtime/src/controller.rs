//! Process control: drives `catalina.sh` with an explicit environment.
//!
//! The controller never exports anything into its own process
//! environment. Each invocation gets the `CATALINA_*` variables and the
//! Java home hint attached directly to the spawned [`Command`].

use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use catbase_common::error::{LauncherError, Result};
use catbase_common::types::{ControlMode, RuntimeEnvironment};

use crate::cleanup::SignalCleanup;
use crate::pid::{self, PidStatus};
use crate::state::StateDir;

/// Everything `status` prints, plus the liveness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Environment root.
    pub env_root: PathBuf,
    /// Deployment root.
    pub deploy_root: PathBuf,
    /// Java executable.
    pub java: PathBuf,
    /// Tomcat home.
    pub catalina_home: PathBuf,
    /// State directory.
    pub state_dir: PathBuf,
    /// Instance log directory.
    pub log_dir: PathBuf,
    /// Immutable webapps in the deployment root.
    pub deploy_webapps: PathBuf,
    /// Mutable webapps in the instance.
    pub instance_webapps: PathBuf,
    /// PID record.
    pub pid_file: PathBuf,
    /// Result of probing the PID record.
    pub pid_status: PidStatus,
}

impl StatusReport {
    /// Whether the instance is considered running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.pid_status.is_running()
    }
}

/// Drives `catalina.sh` for one resolved environment and state directory.
#[derive(Debug)]
pub struct Controller<'a> {
    env: &'a RuntimeEnvironment,
    state: &'a StateDir,
    signals: Option<&'a SignalCleanup>,
}

impl<'a> Controller<'a> {
    /// Creates a controller over an already-provisioned state directory.
    #[must_use]
    pub const fn new(env: &'a RuntimeEnvironment, state: &'a StateDir) -> Self {
        Self {
            env,
            state,
            signals: None,
        }
    }

    /// Reports spawned children to `signals`, so termination signals reach
    /// `catalina.sh` while the launcher waits for it.
    #[must_use]
    pub const fn with_signals(mut self, signals: &'a SignalCleanup) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Resolved environment this controller drives.
    #[must_use]
    pub const fn env(&self) -> &RuntimeEnvironment {
        self.env
    }

    /// State directory this controller drives.
    #[must_use]
    pub const fn state(&self) -> &StateDir {
        self.state
    }

    /// Variables exported to every `catalina.sh` invocation.
    #[must_use]
    pub fn exported_env(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("CATALINA_HOME", self.env.catalina_home.clone()),
            ("CATALINA_BASE", self.state.base()),
            ("CATALINA_TMPDIR", self.state.temp()),
            ("CATALINA_OUT", self.state.catalina_out()),
            ("CATALINA_PID", self.state.pid_file()),
            (
                self.env.java_home.var_name(),
                self.env.java_home.path().to_path_buf(),
            ),
        ]
    }

    /// Builds the `catalina.sh <mode>` command with the exported environment.
    #[must_use]
    pub fn command(&self, mode: ControlMode) -> Command {
        let mut cmd = Command::new(&self.env.control_script);
        let _ = cmd.arg(mode.as_str()).envs(self.exported_env());
        cmd
    }

    /// Replaces the current process with `catalina.sh run`.
    ///
    /// Only returns if the exec itself fails. Nothing owned by the caller
    /// is dropped on success, so ephemeral state directories must use
    /// [`Self::run_attached`] instead.
    #[must_use]
    pub fn exec_foreground(&self) -> LauncherError {
        tracing::info!(script = %self.env.control_script.display(), "exec catalina.sh run");
        let err = self.command(ControlMode::Run).exec();
        LauncherError::io(&self.env.control_script, err)
    }

    /// Runs `catalina.sh run` as a child and waits for it.
    ///
    /// Returns the child's exit code; death by signal maps to `128 + signo`.
    /// A termination signal received meanwhile is forwarded to the child,
    /// and its exit code is still the one returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be spawned.
    pub fn run_attached(&self) -> Result<i32> {
        tracing::info!(script = %self.env.control_script.display(), "running catalina.sh attached");
        let status = self.spawn_and_wait(ControlMode::Run)?;
        Ok(status.code().unwrap_or_else(|| {
            use std::os::unix::process::ExitStatusExt;
            128 + status.signal().unwrap_or(0)
        }))
    }

    /// Runs `catalina.sh start`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ExternalProcess`] if the script exits non-zero,
    /// or [`LauncherError::Interrupted`] if a termination signal arrived
    /// while it ran.
    pub fn start(&self) -> Result<()> {
        self.invoke(ControlMode::Start)
    }

    /// Runs `catalina.sh stop`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ExternalProcess`] if the script exits non-zero,
    /// or [`LauncherError::Interrupted`] if a termination signal arrived
    /// while it ran.
    pub fn stop(&self) -> Result<()> {
        self.invoke(ControlMode::Stop)
    }

    /// Stops (tolerating failure) and then starts the instance.
    ///
    /// # Errors
    ///
    /// Returns the start failure. A stop failure is only logged, unless it
    /// was an interruption, which ends the restart.
    pub fn restart(&self) -> Result<()> {
        match self.stop() {
            Err(LauncherError::Interrupted) => return Err(LauncherError::Interrupted),
            Err(e) => {
                tracing::debug!(error = %e, "stop before restart failed; instance may not have been running");
            }
            Ok(()) => {}
        }
        self.start()
    }

    /// Collects resolved paths and probes the PID record.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let pid_file = self.state.pid_file();
        StatusReport {
            env_root: self.env.env_root.clone(),
            deploy_root: self.env.deploy_root.clone(),
            java: self.env.java.clone(),
            catalina_home: self.env.catalina_home.clone(),
            state_dir: self.state.root().to_path_buf(),
            log_dir: self.state.logs(),
            deploy_webapps: self.env.deploy_webapps(),
            instance_webapps: self.state.webapps(),
            pid_status: pid::probe(&pid_file),
            pid_file,
        }
    }

    fn invoke(&self, mode: ControlMode) -> Result<()> {
        tracing::info!(%mode, script = %self.env.control_script.display(), "invoking catalina.sh");
        let status = self.spawn_and_wait(mode)?;
        if self.signals.is_some_and(SignalCleanup::interrupted) {
            return Err(LauncherError::Interrupted);
        }
        if status.success() {
            return Ok(());
        }
        Err(LauncherError::ExternalProcess {
            program: self.env.control_script.clone(),
            mode: mode.to_string(),
            code: status.code(),
        })
    }

    fn spawn_and_wait(&self, mode: ControlMode) -> Result<ExitStatus> {
        let slot = self.signals.map(SignalCleanup::begin_child);
        let mut child = self
            .command(mode)
            .spawn()
            .map_err(|e| LauncherError::io(&self.env.control_script, e))?;
        if let Some(slot) = &slot {
            slot.attach(child.id());
        }
        child
            .wait()
            .map_err(|e| LauncherError::io(&self.env.control_script, e))
    }
}
