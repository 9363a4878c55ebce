//! Configuration Loader
//!
//! Loads configuration from an optional TOML file, applies environment
//! overrides and validates the result. Every section is optional; secrets
//! normally arrive through the environment (or `.env`).

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::solana_tracker::DEFAULT_TRACKER_URL;
use crate::adapters::helius::DEFAULT_HELIUS_URL;
use crate::adapters::telegram::DEFAULT_TELEGRAM_API_URL;
use crate::domain::Thresholds;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
/// One day
pub const MAX_CHECK_INTERVAL_MINUTES: u64 = 24 * 60;

/// Main configuration structure matching monitor.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorSection,
    pub sources: SourcesSection,
    pub solana: SolanaSection,
    pub telegram: TelegramSection,
    pub logging: LoggingSection,
}

/// Polling and qualification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// Minutes between discovery cycles
    pub check_interval_minutes: u64,
    /// Tokens older than this are never announced
    pub max_age_minutes: u64,
    pub min_liquidity_usd: f64,
    pub min_market_cap_usd: f64,
    /// Per-request timeout for every source and the notifier
    pub request_timeout_secs: u64,
    /// Post a "monitor active" message after seeding
    pub announce_startup: bool,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            check_interval_minutes: 1,
            max_age_minutes: 5,
            min_liquidity_usd: 1_000.0,
            min_market_cap_usd: 10_000.0,
            request_timeout_secs: 10,
            announce_startup: true,
        }
    }
}

/// Token sources. An absent or empty API key disables that source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesSection {
    pub solana_tracker_api_key: Option<String>,
    pub solana_tracker_url: String,
    pub helius_api_key: Option<String>,
    pub helius_url: String,
    /// Token accounts sampled by the baseline RPC scan
    pub rpc_scan_limit: usize,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            solana_tracker_api_key: None,
            solana_tracker_url: DEFAULT_TRACKER_URL.to_string(),
            helius_api_key: None,
            helius_url: DEFAULT_HELIUS_URL.to_string(),
            rpc_scan_limit: 10,
        }
    }
}

impl SourcesSection {
    pub fn solana_tracker_key(&self) -> Option<&str> {
        present(&self.solana_tracker_api_key)
    }

    pub fn helius_key(&self) -> Option<&str> {
        present(&self.helius_api_key)
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolanaSection {
    pub rpc_url: String,
}

impl Default for SolanaSection {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
        }
    }
}

/// Telegram Bot API section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramSection {
    pub bot_token: String,
    /// `@channelname` or numeric chat id
    pub channel_id: String,
    pub api_url: String,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            channel_id: String::new(),
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log to file (in addition to stdout)
    pub log_to_file: bool,
    pub log_file: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: "logs/token-monitor.log".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file, then apply process environment overrides
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = read_config(Some(path.as_ref()))?;
    config.validate()?;
    Ok(config)
}

/// Configuration from defaults plus process environment only
pub fn load_from_env() -> Result<Config, ConfigError> {
    let config = read_config(None)?;
    config.validate()?;
    Ok(config)
}

/// File (if any) plus environment overrides, without validation
pub fn read_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config: Config = match path {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    config.apply_overrides_from(|key| std::env::var(key).ok())?;
    Ok(config)
}

impl Config {
    /// Overlay environment values. `lookup` is `std::env::var` in production.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CHECK_INTERVAL_MINUTES") {
            self.monitor.check_interval_minutes = parse_override("CHECK_INTERVAL_MINUTES", &v)?;
        }
        if let Some(v) = get("MAX_AGE_MINUTES") {
            self.monitor.max_age_minutes = parse_override("MAX_AGE_MINUTES", &v)?;
        }
        if let Some(v) = get("MIN_LIQUIDITY_USD") {
            self.monitor.min_liquidity_usd = parse_override("MIN_LIQUIDITY_USD", &v)?;
        }
        if let Some(v) = get("MIN_MARKET_CAP_USD") {
            self.monitor.min_market_cap_usd = parse_override("MIN_MARKET_CAP_USD", &v)?;
        }
        if let Some(v) = get("SOLANA_TRACKER_API_KEY") {
            self.sources.solana_tracker_api_key = Some(v);
        }
        if let Some(v) = get("HELIUS_API_KEY") {
            self.sources.helius_api_key = Some(v);
        }
        if let Some(v) = get("SOLANA_RPC_URL") {
            self.solana.rpc_url = v;
        }
        if let Some(v) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Some(v) = get("TELEGRAM_CHANNEL_ID") {
            self.telegram.channel_id = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "telegram bot_token is required (set TELEGRAM_BOT_TOKEN)".to_string(),
            ));
        }

        if self.telegram.channel_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "telegram channel_id is required (set TELEGRAM_CHANNEL_ID)".to_string(),
            ));
        }

        if !(1..=MAX_CHECK_INTERVAL_MINUTES).contains(&self.monitor.check_interval_minutes) {
            return Err(ConfigError::ValidationError(format!(
                "check_interval_minutes must be 1-{}, got {}",
                MAX_CHECK_INTERVAL_MINUTES, self.monitor.check_interval_minutes
            )));
        }

        if self.monitor.max_age_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "max_age_minutes must be >= 1".to_string(),
            ));
        }

        for (name, value) in [
            ("min_liquidity_usd", self.monitor.min_liquidity_usd),
            ("min_market_cap_usd", self.monitor.min_market_cap_usd),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a finite value >= 0, got {}",
                    name, value
                )));
            }
        }

        if !(1..=60).contains(&self.monitor.request_timeout_secs) {
            return Err(ConfigError::ValidationError(format!(
                "request_timeout_secs must be 1-60, got {}",
                self.monitor.request_timeout_secs
            )));
        }

        if self.solana.rpc_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "solana rpc_url must not be empty".to_string(),
            ));
        }

        if self.sources.rpc_scan_limit == 0 {
            return Err(ConfigError::ValidationError(
                "rpc_scan_limit must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_age_minutes: self.monitor.max_age_minutes,
            min_liquidity_usd: self.monitor.min_liquidity_usd,
            min_market_cap_usd: self.monitor.min_market_cap_usd,
        }
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.check_interval_minutes.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.request_timeout_secs)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!("{} has an invalid value: {:?}", key, value))
    })
}
