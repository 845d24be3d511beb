//! `catbase start` — Start Tomcat in the background.

use std::process::ExitCode;

use catbase_runtime::controller::Controller;

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if `catalina.sh start` fails.
pub fn execute(ctl: &Controller<'_>) -> anyhow::Result<ExitCode> {
    ctl.start()?;
    println!(
        "Tomcat started; logs at {}",
        ctl.state().catalina_out().display()
    );
    if ctl.state().is_ephemeral() {
        #[allow(clippy::print_stderr)]
        {
            eprintln!(
                "note: state directory is temporary and is removed now; pass --keep or --state-dir to preserve it"
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
