//! Qualification Engine
//!
//! Stateless rule set deciding whether a novel token is worth an alert.
//! All conditions are conjunctive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token::TokenRecord;

/// Immutable per-run thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum token age in minutes
    pub max_age_minutes: u64,
    /// Minimum pool liquidity in USD
    pub min_liquidity_usd: f64,
    /// Minimum market cap in USD
    pub min_market_cap_usd: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_age_minutes: 5,
            min_liquidity_usd: 1_000.0,
            min_market_cap_usd: 10_000.0,
        }
    }
}

/// First failing rule for a token
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Disqualification {
    #[error("too old: {age_minutes} min > {max_minutes} min")]
    TooOld { age_minutes: i64, max_minutes: u64 },

    #[error("liquidity ${actual:.2} below ${required:.2}")]
    LowLiquidity { actual: f64, required: f64 },

    #[error("market cap ${actual:.2} below ${required:.2}")]
    LowMarketCap { actual: f64, required: f64 },

    #[error("flagged risky")]
    Risky,
}

#[derive(Debug, Clone, Copy)]
pub struct QualificationEngine {
    thresholds: Thresholds,
}

impl QualificationEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate every rule, returning the first one that fails
    pub fn evaluate(&self, token: &TokenRecord, now_ms: i64) -> Result<(), Disqualification> {
        let t = &self.thresholds;

        if token.is_stale(now_ms, t.max_age_minutes) {
            return Err(Disqualification::TooOld {
                age_minutes: token.age_minutes(now_ms),
                max_minutes: t.max_age_minutes,
            });
        }

        // NaN compares false, so a NaN quantity never qualifies
        if !(token.liquidity_usd >= t.min_liquidity_usd) {
            return Err(Disqualification::LowLiquidity {
                actual: token.liquidity_usd,
                required: t.min_liquidity_usd,
            });
        }

        if !(token.market_cap_usd >= t.min_market_cap_usd) {
            return Err(Disqualification::LowMarketCap {
                actual: token.market_cap_usd,
                required: t.min_market_cap_usd,
            });
        }

        if token.risky {
            return Err(Disqualification::Risky);
        }

        Ok(())
    }

    pub fn qualifies(&self, token: &TokenRecord, now_ms: i64) -> bool {
        self.evaluate(token, now_ms).is_ok()
    }
}
