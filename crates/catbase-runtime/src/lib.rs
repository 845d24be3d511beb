//! Launcher runtime for catbase.
//!
//! Resolves a Java runtime and a Tomcat installation, prepares the
//! mutable `CATALINA_BASE` tree, and drives `catalina.sh` through its
//! `run`, `start`, and `stop` modes.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cleanup;
pub mod controller;
pub mod filesystem;
pub mod pid;
pub mod provision;
pub mod resolver;
pub mod state;
pub mod webapps;
