//! Solana Token Monitor Library
//!
//! Discovers newly created Solana tokens, drops anything already seen or too
//! old, keeps the fresh, liquid and non-risky ones and announces each to a
//! Telegram channel exactly once.
//!
//! # Modules
//!
//! - `domain`: Core policy (TokenRecord, KnownSet, NoveltyFilter, QualificationEngine, risk)
//! - `ports`: Trait abstractions (TokenSource, Notifier) and test doubles
//! - `adapters`: External implementations (Solana Tracker, Helius, Solana RPC, Telegram, CLI)
//! - `config`: Configuration loading, environment overrides and validation
//! - `application`: Aggregator, formatter, monitor loop and diagnostics

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
