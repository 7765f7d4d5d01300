//! flare-transfer: the four cross-chain transfer legs and delegation
//!
//! A transfer between the two chains is two transactions: an export that
//! moves funds into shared atomic memory and an import that claims them on
//! the other side. Each leg here is one pipeline run: fetch chain state,
//! build, settle the fee, sign, broadcast. The [`Context`] carries the
//! resolved network, identity, and chain clients for the whole run.

pub mod context;
pub mod errors;
pub mod staking;
pub mod transfer;

pub use context::{ChainIds, Context};
pub use errors::Error;
pub use staking::{add_delegator, add_delegator_with_keychain, add_delegator_with_vault, DELEGATION_MEMO};
pub use transfer::{
    export_from_platform, export_from_platform_with_keychain, export_from_platform_with_vault,
    export_to_platform, export_to_platform_with_keychain, export_to_platform_with_vault,
    import_from_platform, import_from_platform_with_keychain, import_from_platform_with_vault,
    import_to_platform, import_to_platform_with_keychain, import_to_platform_with_vault,
    TransferOutcome, PLATFORM_EXPORT_MEMO, PLATFORM_IMPORT_MEMO,
};
