//! Token Record
//!
//! Canonical shape every data source is normalized into before it reaches
//! the novelty filter.

use serde::{Deserialize, Serialize};

/// Milliseconds in one minute
pub const MS_PER_MINUTE: i64 = 60_000;

/// Which adapter produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    SolanaTracker,
    Helius,
    RpcScan,
    /// Hand-built records (tests, manual injection)
    Manual,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::SolanaTracker => "solana-tracker",
            SourceTag::Helius => "helius",
            SourceTag::RpcScan => "rpc-scan",
            SourceTag::Manual => "manual",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A newly discovered token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Mint address (primary key)
    pub mint: String,
    /// Display name
    pub name: Option<String>,
    /// Ticker symbol
    pub symbol: Option<String>,
    /// Token decimals
    pub decimals: u8,
    /// Creation time in unix milliseconds (estimate when the source has none)
    pub created_time_ms: i64,
    /// Pool liquidity in USD
    pub liquidity_usd: f64,
    /// Market cap in USD
    pub market_cap_usd: f64,
    /// Price in USD
    pub price_usd: f64,
    /// Holder count
    pub holders: u64,
    /// Risk verdict computed by the adapter
    pub risky: bool,
    /// Free-form description
    pub description: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Producing adapter
    pub source: SourceTag,
}

impl TokenRecord {
    /// Record with every optional field at its documented default
    pub fn new(mint: impl Into<String>, created_time_ms: i64, source: SourceTag) -> Self {
        Self {
            mint: mint.into(),
            name: None,
            symbol: None,
            decimals: 0,
            created_time_ms,
            liquidity_usd: 0.0,
            market_cap_usd: 0.0,
            price_usd: 0.0,
            holders: 0,
            risky: false,
            description: None,
            image: None,
            source,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_market(mut self, liquidity_usd: f64, market_cap_usd: f64, price_usd: f64) -> Self {
        self.liquidity_usd = liquidity_usd;
        self.market_cap_usd = market_cap_usd;
        self.price_usd = price_usd;
        self
    }

    pub fn with_holders(mut self, holders: u64) -> Self {
        self.holders = holders;
        self
    }

    pub fn with_risky(mut self, risky: bool) -> Self {
        self.risky = risky;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Age in milliseconds at `now_ms` (negative if the creation time is in the future)
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.created_time_ms)
    }

    /// Age in whole minutes, floored and never negative
    pub fn age_minutes(&self, now_ms: i64) -> i64 {
        (self.age_ms(now_ms) / MS_PER_MINUTE).max(0)
    }

    /// True when older than `max_age_minutes` at `now_ms`
    pub fn is_stale(&self, now_ms: i64, max_age_minutes: u64) -> bool {
        self.age_ms(now_ms) > max_age_ms(max_age_minutes)
    }
}

/// Convert a minute window to milliseconds
pub fn max_age_ms(max_age_minutes: u64) -> i64 {
    i64::try_from(max_age_minutes)
        .unwrap_or(i64::MAX)
        .saturating_mul(MS_PER_MINUTE)
}

/// Current wall-clock time in unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Treat empty or whitespace-only strings as missing
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
