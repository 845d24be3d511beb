//! `catbase stop` — Stop a background Tomcat.

use std::process::ExitCode;

use catbase_runtime::controller::Controller;

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if `catalina.sh stop` fails.
pub fn execute(ctl: &Controller<'_>) -> anyhow::Result<ExitCode> {
    ctl.stop()?;
    println!("Tomcat stopped");
    Ok(ExitCode::SUCCESS)
}
