//! Pipeline error surface

use flarebridge_core::{ChainError, KeyError, NetworkError, TxError};
use flare_signer::SignerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("external signing requires an identity without a private key")]
    PrivateKeyForbidden,
}
