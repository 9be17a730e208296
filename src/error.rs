use thiserror::Error;

/// SDK Error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed decimal or integer amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Attestation payload that does not match the tip schema
    #[error("Malformed attestation: {0}")]
    MalformedAttestation(String),

    /// Malformed hex address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// JSON-RPC error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// GraphQL indexer error
    #[error("Indexer error: {0}")]
    Indexer(String),

    /// Contract return data could not be decoded
    #[error("Contract error: {0}")]
    Contract(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Action refused before submission; the message is meant for the user
    #[error("{0}")]
    Rejected(String),

    /// ABI encoding or decoding error
    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
