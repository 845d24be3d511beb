//! CLI command definitions and dispatch.

pub mod restart;
pub mod run;
pub mod start;
pub mod status;
pub mod stop;

use std::path::PathBuf;
use std::process::ExitCode;

use catbase_common::config::LauncherConfig;
use catbase_runtime::cleanup::SignalCleanup;
use catbase_runtime::controller::Controller;
use catbase_runtime::state::StateDir;
use catbase_runtime::{provision, resolver};
use clap::{Parser, Subcommand};

/// catbase — launch a Tomcat instance with an immutable bundle and mutable state.
#[derive(Parser, Debug)]
#[command(name = "catbase", version, about, long_about = None)]
pub struct Cli {
    /// Lifecycle command to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Persistent state directory (created if absent, never deleted).
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Keep an auto-created state directory after exit.
    #[arg(long, global = true)]
    pub keep: bool,
}

/// Available lifecycle commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run Tomcat in the foreground.
    Run,
    /// Start Tomcat in the background.
    Start,
    /// Stop a background Tomcat.
    Stop,
    /// Stop (if running) and start again.
    Restart,
    /// Print resolved paths and whether Tomcat is running.
    Status,
}

/// Resolves the environment, provisions the state directory, and
/// dispatches the parsed command.
///
/// The state directory guard lives until this function returns, so an
/// auto-created directory is gone before the process exits. When the
/// directory will be auto-removed, the signal handler is installed before
/// it is created.
///
/// # Errors
///
/// Returns an error if resolution, provisioning, or the command fails.
pub fn execute(cli: Cli, deploy_root: Option<&str>) -> anyhow::Result<ExitCode> {
    let config = LauncherConfig::from_env()
        .with_deploy_root(deploy_root)
        .with_state(cli.state_dir, cli.keep);

    let env = resolver::resolve(&config)?;
    let signals = SignalCleanup::new();
    if config.state_dir.is_none() && !config.keep {
        signals.install()?;
    }
    let state = StateDir::acquire(
        config.state_dir.as_deref(),
        &config.runtime_parent(),
        config.keep,
    )?;
    if state.is_ephemeral() {
        signals.arm(state.root())?;
    }
    let _ = provision::provision(&env, &state)?;

    let ctl = Controller::new(&env, &state).with_signals(&signals);
    match cli.command {
        Command::Run => run::execute(&ctl),
        Command::Start => start::execute(&ctl),
        Command::Stop => stop::execute(&ctl),
        Command::Restart => restart::execute(&ctl),
        Command::Status => Ok(status::execute(&ctl)),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_are_accepted_after_the_command() {
        let cli = Cli::try_parse_from(["catbase", "status", "--state-dir", "/srv/state", "--keep"])
            .expect("parse");
        assert_eq!(cli.command, Command::Status);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/srv/state")));
        assert!(cli.keep);
    }

    #[test]
    fn missing_command_is_rejected() {
        let err = Cli::try_parse_from(["catbase", "--keep"]).expect_err("no command");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn two_commands_are_rejected() {
        assert!(Cli::try_parse_from(["catbase", "start", "stop"]).is_err());
    }
}
