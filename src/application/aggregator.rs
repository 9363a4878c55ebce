//! Source Aggregator
//!
//! Fans out to every enabled token source, bounds each call with its own
//! timeout and concatenates the results in source order. A failing or hung
//! source contributes nothing. When the enabled sources yield zero records
//! the baseline RPC scan is consulted instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::adapters::helius::{HeliusClient, HeliusConfig};
use crate::adapters::solana::{RpcScanSource, SolanaClient};
use crate::adapters::solana_tracker::{SolanaTrackerClient, SolanaTrackerConfig};
use crate::config::Config;
use crate::domain::{SourceTag, TokenRecord};
use crate::ports::{SourceError, TokenSource};

pub struct SourceAggregator {
    sources: Vec<Arc<dyn TokenSource>>,
    baseline: Arc<dyn TokenSource>,
    timeout: Duration,
}

impl SourceAggregator {
    pub fn new(
        sources: Vec<Arc<dyn TokenSource>>,
        baseline: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            sources,
            baseline,
            timeout,
        }
    }

    /// Wire up every source whose credentials are present, plus the RPC baseline
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let timeout = config.request_timeout();
        let mut sources: Vec<Arc<dyn TokenSource>> = Vec::new();

        if let Some(key) = config.sources.solana_tracker_key() {
            let client = SolanaTrackerClient::new(
                SolanaTrackerConfig::new(key)
                    .with_api_url(config.sources.solana_tracker_url.clone())
                    .with_timeout(timeout),
            )?;
            sources.push(Arc::new(client));
        }

        if let Some(key) = config.sources.helius_key() {
            let client = HeliusClient::new(
                HeliusConfig::new(key)
                    .with_api_url(config.sources.helius_url.clone())
                    .with_timeout(timeout),
            )?;
            sources.push(Arc::new(client));
        }

        let solana = SolanaClient::new(config.solana.rpc_url.clone(), timeout);
        let baseline = Arc::new(RpcScanSource::new(solana, config.sources.rpc_scan_limit));

        Ok(Self::new(sources, baseline, timeout))
    }

    pub fn sources(&self) -> &[Arc<dyn TokenSource>] {
        &self.sources
    }

    pub fn enabled_sources(&self) -> Vec<SourceTag> {
        self.sources.iter().map(|s| s.tag()).collect()
    }

    pub fn baseline_source(&self) -> SourceTag {
        self.baseline.tag()
    }

    /// Gather candidates for one cycle. Never fails; total failure is an empty list.
    pub async fn collect(&self) -> Vec<TokenRecord> {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let timeout = self.timeout;
                tokio::spawn(async move { fetch_bounded(source.as_ref(), timeout).await })
            })
            .collect();

        let mut candidates = Vec::new();
        for (handle, source) in handles.into_iter().zip(&self.sources) {
            match handle.await {
                Ok(records) => candidates.extend(records),
                Err(e) => warn!("Source {} task failed: {}", source.tag(), e),
            }
        }

        if candidates.is_empty() {
            if self.sources.is_empty() {
                info!("No API sources enabled, using {} scan", self.baseline.tag());
            } else {
                info!("API sources returned nothing, falling back to {} scan", self.baseline.tag());
            }
            candidates = fetch_bounded(self.baseline.as_ref(), self.timeout).await;
        }

        debug!("Aggregated {} candidates", candidates.len());
        candidates
    }
}

/// One source call resolved to "records or nothing"
async fn fetch_bounded(source: &dyn TokenSource, timeout: Duration) -> Vec<TokenRecord> {
    let tag = source.tag();
    match tokio::time::timeout(timeout, source.fetch_tokens()).await {
        Ok(Ok(records)) => {
            debug!("Source {} returned {} tokens", tag, records.len());
            records
        }
        Ok(Err(e)) => {
            warn!("Source {} failed: {}", tag, e);
            vec![]
        }
        Err(_) => {
            warn!("Source {} failed: {}", tag, SourceError::Timeout(timeout.as_secs()));
            vec![]
        }
    }
}
