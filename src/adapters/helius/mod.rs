//! Helius Adapter
//!
//! Token metadata feed from the Helius API. Enabled when a Helius API key is
//! configured.

mod client;

pub use client::{parse_helius_token, HeliusClient, HeliusConfig, HeliusToken, DEFAULT_HELIUS_URL};
