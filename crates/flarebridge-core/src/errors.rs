//! Error types for flarebridge

use thiserror::Error;

/// Network name resolution and staging-override errors
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Invalid network: {name}")]
    UnknownNetwork { name: String },

    #[error("Invalid network: url override is only allowed for staging networks, not {name}")]
    StagingOverrideNotAllowed { name: String },

    #[error("Invalid network url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Key reconciliation and address derivation errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("provided private key does not match the public key")]
    KeyMismatch,

    #[error("derived address {derived} does not match address from private key {expected}")]
    AddressMismatch { derived: String, expected: String },

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("no key material supplied (need a public or private key)")]
    NoKeyMaterial,
}

/// Collaborator (node RPC) call failures
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC {method} failed: {message}")]
    Rpc { method: String, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Malformed response in {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Transaction building errors
#[derive(Debug, Error)]
pub enum TxError {
    #[error("No UTXOs available")]
    NoUtxos,

    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Failed to build transaction: {0}")]
    BuildFailed(String),

    #[error("Invalid chain or asset id: {0}")]
    InvalidId(String),

    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),
}
