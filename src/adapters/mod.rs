//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Solana Tracker: latest launches with market data and risk
//! - Helius: token metadata feed
//! - Solana: RPC client, Metaplex metadata and the baseline account scan
//! - Telegram: Bot API notifier
//! - CLI: Command-line interface definitions

pub mod solana_tracker;
pub mod helius;
pub mod solana;
pub mod telegram;
pub mod cli;

pub use solana_tracker::{SolanaTrackerClient, SolanaTrackerConfig};
pub use helius::{HeliusClient, HeliusConfig};
pub use solana::{RpcScanSource, SolanaClient};
pub use telegram::{TelegramConfig, TelegramNotifier};
pub use cli::CliApp;
