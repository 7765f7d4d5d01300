//! Chain access traits

use async_trait::async_trait;
use flarebridge_core::{ChainError, TxId};
use flare_tx::Utxo;

use crate::responses::BalanceResponse;

/// Contract-chain queries and broadcast
#[async_trait]
pub trait ContractChain: Send + Sync {
    /// Current base fee in nanoFLR per cost unit
    async fn base_fee(&self) -> Result<u64, ChainError>;

    /// Pending-inclusive transaction count of an account, used as the
    /// nonce for the next transaction
    async fn transaction_count(&self, address: &str) -> Result<u64, ChainError>;

    /// Atomic-memory UTXOs exported to these addresses from `source_chain`
    async fn fetch_utxos(
        &self,
        addresses: &[String],
        source_chain: &str,
    ) -> Result<Vec<Utxo>, ChainError>;

    /// Broadcast a signed transaction, returning its id
    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<TxId, ChainError>;
}

/// Platform-chain queries and broadcast
#[async_trait]
pub trait PlatformChain: Send + Sync {
    /// UTXOs held by these addresses; with `source_chain`, the atomic-memory
    /// UTXOs exported from that chain instead
    async fn fetch_utxos(
        &self,
        addresses: &[String],
        source_chain: Option<&str>,
    ) -> Result<Vec<Utxo>, ChainError>;

    /// Balance breakdown of an address
    async fn balance(&self, address: &str) -> Result<BalanceResponse, ChainError>;

    /// Broadcast a signed transaction, returning its id
    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<TxId, ChainError>;
}
