//! flare-tx: atomic transaction model, wire codec, and fee estimation
//!
//! Transactions are structured values with the fee baked into the balance of
//! inputs and outputs, so changing the fee means rebuilding. The transfer
//! pipeline's two-phase construction relies on this. Builders are pure
//! functions over explicit inputs; nothing here performs I/O.

pub mod atomic;
pub mod builder;
pub mod codec;
pub mod fee;
pub mod format;
pub mod ids;

pub use atomic::{
    AddDelegatorTx, ContractExportTx, ContractImportTx, EvmInput, EvmOutput, OutputOwners,
    PlatformExportTx, PlatformImportTx, SignedTx, TransferInput, TransferOutput, UnsignedTx, Utxo,
};
pub use builder::{
    build_add_delegator, build_contract_export, build_contract_import, build_platform_export,
    build_platform_import, ContractExportRequest, DelegatorRequest, PlatformExportRequest,
    PlatformImportRequest,
};
pub use fee::{estimate_fee, transaction_cost, COST_PER_SIGNATURE, TX_FIXED_COST};
pub use format::integer_to_decimal;
pub use ids::{ChainId, NodeId};
