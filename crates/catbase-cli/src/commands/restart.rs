//! `catbase restart` — Stop (if running) and start Tomcat.

use std::process::ExitCode;

use catbase_runtime::controller::Controller;

/// Executes the `restart` command.
///
/// # Errors
///
/// Returns an error if the start half fails; a failed stop is tolerated.
pub fn execute(ctl: &Controller<'_>) -> anyhow::Result<ExitCode> {
    ctl.restart()?;
    println!(
        "Tomcat restarted; logs at {}",
        ctl.state().catalina_out().display()
    );
    Ok(ExitCode::SUCCESS)
}
