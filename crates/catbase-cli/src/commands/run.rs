//! `catbase run` — Run Tomcat in the foreground.

use std::process::ExitCode;

use catbase_runtime::controller::Controller;

/// Executes the `run` command.
///
/// Persistent and retained state directories hand the process over to
/// `catalina.sh run`. An ephemeral directory has to be removed afterwards,
/// so there the launcher waits for the child and forwards its exit code.
///
/// # Errors
///
/// Returns an error if `catalina.sh` cannot be executed.
pub fn execute(ctl: &Controller<'_>) -> anyhow::Result<ExitCode> {
    if ctl.state().is_ephemeral() {
        let code = ctl.run_attached()?;
        return Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)));
    }
    Err(ctl.exec_foreground().into())
}
