//! CLI Command Definitions
//!
//! Argument parsing for the token monitor. Handlers live in `main.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Token Monitor - new-token alerts for Solana
#[derive(Parser, Debug)]
#[command(
    name = "token-monitor",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "New-token discovery bot for Solana with Telegram alerts",
    long_about = "Polls launch feeds (Solana Tracker, Helius, on-chain scan), keeps only \
                  tokens that are fresh, liquid and not flagged risky, and posts each one \
                  to a Telegram channel exactly once."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the monitoring loop
    Run(RunCmd),

    /// Validate configuration and probe every configured endpoint
    Check(CheckCmd),
}

/// Start monitoring loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file (environment only when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Connectivity check
#[derive(Parser, Debug)]
pub struct CheckCmd {
    /// Path to configuration file (environment only when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also post a test message to the channel
    #[arg(long)]
    pub send_test: bool,
}
