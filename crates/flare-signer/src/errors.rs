//! Signing failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("identity holds no private key")]
    MissingKey,

    #[error("approval denied: {reason}")]
    ApprovalDenied { reason: String },

    #[error("approval not granted within {seconds}s")]
    ApprovalTimeout { seconds: u64 },

    #[error("approval request expired")]
    ApprovalExpired,

    #[error("vault transport error: {0}")]
    Transport(String),

    #[error("malformed vault response: {0}")]
    MalformedResponse(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
