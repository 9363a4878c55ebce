//! Baseline RPC Scan
//!
//! Last-resort token source that needs no API key: samples SPL token
//! accounts straight from the ledger, then resolves each distinct mint's
//! decimals and Metaplex name/symbol in a single `getMultipleAccounts` call.
//! The ledger does not expose creation time here, so records are stamped
//! with the scan time and carry no market data.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use solana_sdk::{account::Account, pubkey::Pubkey};

use super::metadata::{metadata_pda, metadata_program_id, parse_metadata};
use super::rpc::{SolanaClient, SolanaClientError};
use crate::domain::token::now_ms;
use crate::domain::{SourceTag, TokenRecord};
use crate::ports::{SourceError, TokenSource};

/// SPL Token program
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
/// Size of an SPL token account
pub const TOKEN_ACCOUNT_LEN: usize = 165;
/// Size of an SPL mint account
pub const MINT_ACCOUNT_LEN: usize = 82;

/// Token account: mint (32) | owner (32) | amount (8) | delegate (36) | state (1) ...
const TOKEN_ACCOUNT_STATE_OFFSET: usize = 108;
/// Mint: mint_authority (36) | supply (8) | decimals (1) | is_initialized (1) ...
const MINT_DECIMALS_OFFSET: usize = 44;
const MINT_INITIALIZED_OFFSET: usize = 45;

/// Decimals assumed when the mint account cannot be read
pub const DEFAULT_DECIMALS: u8 = 6;
pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_SYMBOL: &str = "UNK";

impl From<SolanaClientError> for SourceError {
    fn from(err: SolanaClientError) -> Self {
        SourceError::Rpc(err.to_string())
    }
}

pub struct RpcScanSource {
    solana: SolanaClient,
    scan_limit: usize,
}

impl RpcScanSource {
    pub fn new(solana: SolanaClient, scan_limit: usize) -> Self {
        Self { solana, scan_limit }
    }
}

#[async_trait]
impl TokenSource for RpcScanSource {
    fn tag(&self) -> SourceTag {
        SourceTag::RpcScan
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, SourceError> {
        let token_program = Pubkey::from_str(SPL_TOKEN_PROGRAM_ID)
            .map_err(|e| SolanaClientError::InvalidPublicKey(e.to_string()))?;
        let accounts = self
            .solana
            .get_program_accounts_sized(token_program, TOKEN_ACCOUNT_LEN as u64, self.scan_limit)
            .await?;

        let mints = distinct_mints(&accounts);
        if mints.is_empty() {
            return Ok(vec![]);
        }

        let program_id = metadata_program_id()?;
        let mut lookups = mints.clone();
        lookups.extend(mints.iter().map(|m| metadata_pda(&program_id, m)));

        let fetched = self.solana.get_multiple_accounts(lookups).await?;
        let (mint_accounts, metadata_accounts) = fetched.split_at(mints.len().min(fetched.len()));

        let now = now_ms();
        Ok(mints
            .iter()
            .enumerate()
            .map(|(i, mint)| {
                build_record(
                    mint,
                    mint_accounts.get(i).and_then(Option::as_ref),
                    metadata_accounts.get(i).and_then(Option::as_ref),
                    now,
                )
            })
            .collect())
    }
}

/// Mints referenced by token accounts, first occurrence order, no repeats
pub fn distinct_mints(accounts: &[(Pubkey, Account)]) -> Vec<Pubkey> {
    let mut seen = HashSet::new();
    accounts
        .iter()
        .filter_map(|(_, account)| token_account_mint(&account.data))
        .filter(|mint| seen.insert(*mint))
        .collect()
}

/// Mint of an initialized SPL token account
pub fn token_account_mint(data: &[u8]) -> Option<Pubkey> {
    if data.len() != TOKEN_ACCOUNT_LEN || data[TOKEN_ACCOUNT_STATE_OFFSET] == 0 {
        return None;
    }
    let bytes: [u8; 32] = data[..32].try_into().ok()?;
    Some(Pubkey::new_from_array(bytes))
}

/// Decimals of an initialized SPL mint account
pub fn mint_decimals(data: &[u8]) -> Option<u8> {
    if data.len() != MINT_ACCOUNT_LEN || data[MINT_INITIALIZED_OFFSET] == 0 {
        return None;
    }
    Some(data[MINT_DECIMALS_OFFSET])
}

pub fn build_record(
    mint: &Pubkey,
    mint_account: Option<&Account>,
    metadata_account: Option<&Account>,
    now_ms: i64,
) -> TokenRecord {
    let decimals = mint_account
        .and_then(|a| mint_decimals(&a.data))
        .unwrap_or(DEFAULT_DECIMALS);

    let metadata = metadata_account.and_then(|a| parse_metadata(&a.data));
    let (name, symbol) = match metadata {
        Some(meta) => (
            non_blank_or(meta.name, UNKNOWN_NAME),
            non_blank_or(meta.symbol, UNKNOWN_SYMBOL),
        ),
        None => (UNKNOWN_NAME.to_string(), UNKNOWN_SYMBOL.to_string()),
    };

    let mut record = TokenRecord::new(mint.to_string(), now_ms, SourceTag::RpcScan)
        .with_name(name)
        .with_symbol(symbol);
    record.decimals = decimals;
    record
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
