//! CLI Adapter
//!
//! Command-line interface for the token monitor.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CheckCmd, CliApp, Command, RunCmd};
