//! Solana Tracker Client
//!
//! Polls the latest-tokens endpoint and maps each entry into a `TokenRecord`.
//! Liquidity, market cap and price come from the first listed pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use super::types::{TrackerTokenEntry, UsdValue};
use crate::domain::risk::assess_tracker_risk;
use crate::domain::token::{non_empty, now_ms};
use crate::domain::{SourceTag, TokenRecord};
use crate::ports::{SourceError, TokenSource};

/// Latest-tokens endpoint
pub const DEFAULT_TRACKER_URL: &str = "https://data.solanatracker.io/tokens/latest";

/// Configuration for the SolanaTrackerClient
#[derive(Debug, Clone)]
pub struct SolanaTrackerConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl SolanaTrackerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_TRACKER_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SolanaTrackerClient {
    config: SolanaTrackerConfig,
    http: Client,
}

impl SolanaTrackerClient {
    pub fn new(config: SolanaTrackerConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::NotConfigured("Solana Tracker API key is empty".into()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    async fn fetch_entries(&self) -> Result<Vec<TrackerTokenEntry>, SourceError> {
        let response = self
            .http
            .get(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let values = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(decode_entries(values))
    }
}

#[async_trait]
impl TokenSource for SolanaTrackerClient {
    fn tag(&self) -> SourceTag {
        SourceTag::SolanaTracker
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, SourceError> {
        let entries = self.fetch_entries().await?;
        let now = now_ms();
        Ok(entries
            .into_iter()
            .filter_map(|entry| parse_tracker_entry(entry, now))
            .collect())
    }
}

/// Decode each entry on its own so one malformed entry does not cost the
/// whole batch. Bad entries are logged and skipped.
pub fn decode_entries(values: Vec<Value>) -> Vec<TrackerTokenEntry> {
    let total = values.len();
    let entries: Vec<TrackerTokenEntry> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed Solana Tracker entry: {}", e);
                None
            }
        })
        .collect();

    if entries.len() < total {
        warn!("Solana Tracker: decoded {}/{} entries", entries.len(), total);
    }
    entries
}

/// Map one Solana Tracker entry. Entries without a mint are dropped.
pub fn parse_tracker_entry(entry: TrackerTokenEntry, now_ms: i64) -> Option<TokenRecord> {
    let TrackerTokenEntry { token, pools, holders, risk } = entry;

    let Some(mint) = non_empty(token.mint) else {
        tracing::debug!("Skipping Solana Tracker entry without mint");
        return None;
    };

    let created_time_ms = token
        .creation
        .as_ref()
        .and_then(|c| c.created_time)
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| (secs * 1000.0) as i64)
        .unwrap_or(now_ms);

    let pool = pools.first();

    Some(TokenRecord {
        mint,
        name: non_empty(token.name),
        symbol: non_empty(token.symbol),
        decimals: token.decimals.unwrap_or(0),
        created_time_ms,
        liquidity_usd: UsdValue::usd_or_zero(pool.and_then(|p| p.liquidity.as_ref())),
        market_cap_usd: UsdValue::usd_or_zero(pool.and_then(|p| p.market_cap.as_ref())),
        price_usd: UsdValue::usd_or_zero(pool.and_then(|p| p.price.as_ref())),
        holders: holders
            .filter(|h| h.is_finite() && *h >= 0.0)
            .map_or(0, |h| h as u64),
        risky: assess_tracker_risk(risk.as_ref()),
        description: non_empty(token.description),
        image: non_empty(token.image),
        source: SourceTag::SolanaTracker,
    })
}
