//! Core type definitions for flarebridge

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction ID as returned by a node on broadcast (cb58-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount in the ledger's smallest unit (1 FLR = 1_000_000_000 nanoFLR)
pub type NanoFlr = u64;

/// Constants
pub mod constants {
    use super::NanoFlr;

    /// 1 FLR in nanoFLR
    pub const NANOFLR_PER_FLR: NanoFlr = 1_000_000_000;

    /// Fractional digits of the native asset
    pub const FLR_DECIMALS: u32 = 9;

    /// Fixed fee for platform-chain transactions (import/export/delegate)
    pub const P_CHAIN_TX_FEE: NanoFlr = 1_000_000;
}
