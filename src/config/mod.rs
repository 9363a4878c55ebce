//! Configuration Module
//!
//! Loads configuration from TOML files and the environment, then validates it.

pub mod loader;

pub use loader::{
    load_config, load_from_env, read_config, Config, ConfigError, LoggingSection, MonitorSection,
    SolanaSection, SourcesSection, TelegramSection, DEFAULT_RPC_URL,
};
