//! Metaplex Token Metadata
//!
//! PDA derivation and a minimal decoder for the name/symbol/uri prefix of a
//! Metaplex `MetadataV1` account.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use super::rpc::SolanaClientError;

/// Metaplex Token Metadata program
pub const METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

/// Account discriminator for `MetadataV1`
const KEY_METADATA_V1: u8 = 4;
/// key (1) + update authority (32) + mint (32)
const STRINGS_OFFSET: usize = 1 + 32 + 32;
/// Upper bound on a borsh string length we are willing to decode
const MAX_STRING_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

pub fn metadata_program_id() -> Result<Pubkey, SolanaClientError> {
    Pubkey::from_str(METADATA_PROGRAM_ID)
        .map_err(|e| SolanaClientError::InvalidPublicKey(e.to_string()))
}

/// Metadata PDA: seeds `["metadata", program_id, mint]`
pub fn metadata_pda(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (pda, _bump) = Pubkey::find_program_address(
        &[b"metadata", program_id.as_ref(), mint.as_ref()],
        program_id,
    );
    pda
}

/// Decode name, symbol and uri. Returns None for anything that is not a
/// well-formed `MetadataV1` account.
pub fn parse_metadata(data: &[u8]) -> Option<TokenMetadata> {
    if data.first() != Some(&KEY_METADATA_V1) {
        return None;
    }

    let mut offset = STRINGS_OFFSET;
    let name = read_string(data, &mut offset)?;
    let symbol = read_string(data, &mut offset)?;
    let uri = read_string(data, &mut offset)?;

    Some(TokenMetadata { name, symbol, uri })
}

/// Borsh string: u32 little-endian length followed by UTF-8 bytes.
/// Metaplex pads fixed-width fields with NUL bytes, which are trimmed.
fn read_string(data: &[u8], offset: &mut usize) -> Option<String> {
    let len_bytes: [u8; 4] = data.get(*offset..*offset + 4)?.try_into().ok()?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_STRING_LEN {
        return None;
    }
    *offset += 4;

    let raw = data.get(*offset..*offset + len)?;
    *offset += len;

    Some(
        String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .trim()
            .to_string(),
    )
}

#[cfg(test)]
pub(crate) fn encode_metadata(name: &str, symbol: &str, uri: &str, pad_to: usize) -> Vec<u8> {
    let mut data = vec![KEY_METADATA_V1];
    data.extend_from_slice(&[1u8; 32]);
    data.extend_from_slice(&[2u8; 32]);
    for field in [name, symbol, uri] {
        let mut bytes = field.as_bytes().to_vec();
        if bytes.len() < pad_to {
            bytes.resize(pad_to, 0);
        }
        data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        data.extend_from_slice(&bytes);
    }
    data
}
