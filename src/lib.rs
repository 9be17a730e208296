pub mod address;
pub mod amount;
pub mod analytics;
pub mod attestation;
pub mod client;
pub mod config;
pub mod contracts;
pub mod ens;
pub mod error;
pub mod indexer;
pub mod rpc;
pub mod staking;
pub mod time;
pub mod tipping;

pub use address::{is_valid_address, parse_address, shorten_address};
pub use amount::{format_token_amount, format_units, parse_units, TokenAmount};
pub use attestation::{decode_tip, AttestationRecord, TipPayload, TipView};
pub use client::{ClaimStatus, CommonsClient};
pub use config::{CommonsNetworkConfig, Config, NetworkConstants};
pub use ens::NameResolver;
pub use error::Error;
pub use indexer::{Account, IndexerClient, StakedNft};
pub use rpc::{EthCall, HttpRpc};
pub use time::{format_block_timestamp, format_duration};

// Re-export the EVM primitives used across the public API
pub use alloy_primitives::{Address, U256};
