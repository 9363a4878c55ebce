//! Helius Token Metadata Client
//!
//! Helius only reports metadata, so creation time is stamped with the fetch
//! time and every market field stays at zero. Records from this source never
//! pass the liquidity rules unless thresholds are zero; they mainly feed the
//! Known-Set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::token::{non_empty, now_ms};
use crate::domain::{SourceTag, TokenRecord};
use crate::ports::{SourceError, TokenSource};

pub const DEFAULT_HELIUS_URL: &str = "https://api.helius.xyz/v0/token-metadata";

#[derive(Debug, Clone)]
pub struct HeliusConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl HeliusConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_HELIUS_URL.to_string(),
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

/// Token metadata item as returned by Helius
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeliusToken {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HeliusClient {
    config: HeliusConfig,
    http: Client,
}

impl HeliusClient {
    pub fn new(config: HeliusConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::NotConfigured("Helius API key is empty".into()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl TokenSource for HeliusClient {
    fn tag(&self) -> SourceTag {
        SourceTag::Helius
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, SourceError> {
        let response = self
            .http
            .get(&self.config.api_url)
            .query(&[("api-key", self.config.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let tokens: Vec<HeliusToken> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let now = now_ms();
        Ok(tokens
            .into_iter()
            .filter_map(|t| parse_helius_token(t, now))
            .collect())
    }
}

pub fn parse_helius_token(token: HeliusToken, now_ms: i64) -> Option<TokenRecord> {
    let mint = non_empty(token.mint)?;

    let mut record = TokenRecord::new(mint, now_ms, SourceTag::Helius);
    record.name = non_empty(token.name);
    record.symbol = non_empty(token.symbol);
    record.decimals = token.decimals.unwrap_or(0);
    record.description = non_empty(token.description);
    record.image = non_empty(token.image);
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_parse_helius_token() {
        let tokens: Vec<HeliusToken> = serde_json::from_str(
            r#"[
                {"mint":"HelMint1","name":"Cat","symbol":"CAT","decimals":9,"description":"meow","image":"ipfs://x"},
                {"name":"orphan"}
            ]"#,
        )
        .unwrap();

        let records: Vec<_> = tokens.into_iter().filter_map(|t| parse_helius_token(t, NOW)).collect();
        assert_eq!(records.len(), 1);

        let cat = &records[0];
        assert_eq!(cat.mint, "HelMint1");
        assert_eq!(cat.symbol.as_deref(), Some("CAT"));
        assert_eq!(cat.decimals, 9);
        assert_eq!(cat.created_time_ms, NOW);
        assert_eq!(cat.liquidity_usd, 0.0);
        assert_eq!(cat.market_cap_usd, 0.0);
        assert_eq!(cat.holders, 0);
        assert!(!cat.risky);
        assert_eq!(cat.source, SourceTag::Helius);
    }

    #[test]
    fn test_client_requires_key() {
        assert!(HeliusClient::new(HeliusConfig::new("")).is_err());
        assert!(HeliusClient::new(HeliusConfig::new("k").with_timeout(Duration::from_secs(5))).is_ok());
    }
}
