//! Solana Tracker Adapter
//!
//! Latest token launches from `data.solanatracker.io`, including pool
//! liquidity, market cap, holder counts and risk signals. Enabled when a
//! Solana Tracker API key is configured.

mod client;
mod types;

pub use client::{decode_entries, parse_tracker_entry, SolanaTrackerClient, SolanaTrackerConfig, DEFAULT_TRACKER_URL};
pub use types::{TrackerCreation, TrackerPool, TrackerToken, TrackerTokenEntry, UsdValue};
