//! Solana Tracker Types
//!
//! Response shapes for `GET /tokens/latest`. Every field is optional on the
//! wire; missing values fall back to the canonical defaults during mapping.

use serde::Deserialize;

use crate::domain::risk::TrackerRisk;

/// One entry of the latest-tokens list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerTokenEntry {
    #[serde(default)]
    pub token: TrackerToken,
    #[serde(default)]
    pub pools: Vec<TrackerPool>,
    /// Some responses carry holder counts as floats
    #[serde(default)]
    pub holders: Option<f64>,
    #[serde(default)]
    pub risk: Option<TrackerRisk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerToken {
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
    #[serde(default)]
    pub creation: Option<TrackerCreation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerCreation {
    /// Unix seconds, sometimes fractional
    #[serde(default)]
    pub created_time: Option<f64>,
    #[serde(default)]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerPool {
    #[serde(rename = "poolId", default)]
    pub pool_id: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub liquidity: Option<UsdValue>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<UsdValue>,
    #[serde(default)]
    pub price: Option<UsdValue>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UsdValue {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl UsdValue {
    /// USD amount, 0 when missing or not a finite non-negative number
    pub fn usd_or_zero(value: Option<&UsdValue>) -> f64 {
        value
            .and_then(|v| v.usd)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0)
    }
}
