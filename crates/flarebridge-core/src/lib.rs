//! flarebridge-core: shared types, errors, and network configuration

pub mod errors;
pub mod network;
pub mod types;

pub use errors::{ChainError, KeyError, NetworkError, TxError};
pub use network::{chain_params, ChainParams, NetworkConfig, NetworkRegistry};
pub use types::{constants, NanoFlr, TxId};
