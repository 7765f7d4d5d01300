//! flare-signer: producing credentials for unsigned transactions
//!
//! Two custody models behind one trait: [`KeychainSigner`] signs in-process
//! with a resolved identity's private key, [`VaultSigner`] hands the signing
//! hash to an external approval service and polls for the outcome.

pub mod errors;
pub mod keychain;
pub mod vault;

use async_trait::async_trait;
use flare_tx::{SignedTx, UnsignedTx};

pub use errors::SignerError;
pub use keychain::KeychainSigner;
pub use vault::{ApprovalStatus, VaultConfig, VaultSigner};

/// Anything that can produce a fully signed transaction
#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign(&self, tx: &UnsignedTx) -> Result<SignedTx, SignerError>;
}
