//! flare-chain-client: node access for the two chains
//!
//! [`ContractChain`] and [`PlatformChain`] are the seams the transfer
//! pipeline works against; the `*RpcClient` types implement them over a
//! node's JSON-RPC endpoints. Everything that comes back is parsed eagerly
//! so malformed responses fail at the boundary with context.

pub mod chain;
pub mod contract;
pub mod platform;
pub mod responses;
pub mod rpc;

pub use chain::{ContractChain, PlatformChain};
pub use contract::ContractRpcClient;
pub use platform::PlatformRpcClient;
pub use responses::BalanceResponse;
