pub mod rpc;
pub mod metadata;
pub mod scan;

pub use rpc::{SolanaClient, SolanaClientError};
pub use metadata::{metadata_pda, parse_metadata, TokenMetadata, METADATA_PROGRAM_ID};
pub use scan::RpcScanSource;
