use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SourceTag, TokenRecord};

/// Token source error type
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

/// One external feed of newly created tokens
///
/// Implementations issue a single request per call and map the remote schema
/// into `TokenRecord`s. They hold no shared mutable state.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Adapter tag stamped on every record it produces
    fn tag(&self) -> SourceTag;

    /// Fetch the latest tokens this source knows about
    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, SourceError>;
}
