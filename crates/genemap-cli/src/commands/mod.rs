//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod build;
pub mod clean;
pub mod config;
pub mod info;
pub mod translate;
