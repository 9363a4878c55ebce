use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcProgramAccountsConfig;
use solana_client::rpc_filter::RpcFilterType;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolanaClientError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Task join error: {0}")]
    JoinError(String),
}

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    rpc_url: String,
}

impl SolanaClient {
    /// Create a new Solana RPC client with a per-request timeout
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        let client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            rpc_url.clone(),
            timeout,
            CommitmentConfig::confirmed(),
        ));
        Self { client, rpc_url }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Node software version (connectivity check)
    pub async fn get_version(&self) -> Result<String, SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_version()
                .map(|v| v.solana_core)
                .map_err(|e| SolanaClientError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::JoinError(e.to_string()))?
    }

    /// Program accounts of exactly `data_size` bytes, truncated to `limit`
    pub async fn get_program_accounts_sized(
        &self,
        program_id: Pubkey,
        data_size: u64,
        limit: usize,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let config = RpcProgramAccountsConfig {
                filters: Some(vec![RpcFilterType::DataSize(data_size)]),
                ..Default::default()
            };
            client
                .get_program_accounts_with_config(&program_id, config)
                .map(|mut accounts| {
                    accounts.truncate(limit);
                    accounts
                })
                .map_err(|e| SolanaClientError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::JoinError(e.to_string()))?
    }

    /// Fetch several accounts in one round trip; missing accounts are `None`
    pub async fn get_multiple_accounts(
        &self,
        pubkeys: Vec<Pubkey>,
    ) -> Result<Vec<Option<Account>>, SolanaClientError> {
        if pubkeys.is_empty() {
            return Ok(vec![]);
        }

        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_multiple_accounts(&pubkeys)
                .map_err(|e| SolanaClientError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::JoinError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = SolanaClient::new("https://api.devnet.solana.com".to_string(), Duration::from_secs(10));
        assert_eq!(client.rpc_url(), "https://api.devnet.solana.com");
    }

    #[tokio::test]
    async fn test_multiple_accounts_empty_short_circuits() {
        let client = SolanaClient::new("http://127.0.0.1:1".to_string(), Duration::from_secs(1));
        let accounts = client.get_multiple_accounts(vec![]).await.unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = SolanaClientError::RpcError("test".to_string());
        assert!(err.to_string().contains("RPC request failed"));

        let err = SolanaClientError::InvalidPublicKey("bad".to_string());
        assert!(err.to_string().contains("Invalid public key"));
    }
}
