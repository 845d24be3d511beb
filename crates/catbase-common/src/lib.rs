//! # catbase-common
//!
//! Shared types, error definitions, configuration model, and constants
//! used across the catbase workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and holds the vocabulary the resolver, the state
//! directory manager, and the process controller share.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
