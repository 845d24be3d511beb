//! `catbase status` — Print resolved paths and whether Tomcat is running.

use std::process::ExitCode;

use catbase_runtime::controller::Controller;

/// Executes the `status` command.
///
/// Exits 0 when the PID record names a live process, 1 otherwise.
pub fn execute(ctl: &Controller<'_>) -> ExitCode {
    let report = ctl.status();
    print!("{}", crate::output::render_status(&report));
    if report.is_running() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
