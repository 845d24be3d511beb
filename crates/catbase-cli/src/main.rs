//! # catbase — Tomcat instance launcher
//!
//! Resolves Java and Tomcat from the active environment, prepares a
//! mutable `CATALINA_BASE`, and hands lifecycle commands to `catalina.sh`.

#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;

use std::process::ExitCode;

use catbase_common::constants;
use catbase_common::error::LauncherError;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::commands::Cli;

/// Deployment root substituted when the launcher is packaged.
const DEPLOY_ROOT: Option<&str> = option_env!("CATBASE_DEPLOY_ROOT");

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match commands::execute(cli, DEPLOY_ROOT) {
        Ok(code) => code,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("error: {e:#}");
            }
            if matches!(e.downcast_ref::<LauncherError>(), Some(LauncherError::Interrupted)) {
                return ExitCode::from(constants::SIGNAL_EXIT_CODE);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let json = std::env::var(constants::LOG_FORMAT_VAR)
        .is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
