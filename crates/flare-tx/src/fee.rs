//! Gas-unit cost model for contract-chain atomic transactions
//!
//! Platform-chain transactions pay a fixed fee; contract-chain atomic
//! transactions pay cost units priced at the current base fee. Cost only
//! depends on the serialized length and the signature count, so recomputing
//! it for a rebuilt transaction of the same shape gives the same value.

use crate::atomic::UnsignedTx;

/// Cost units charged per signature slot
pub const COST_PER_SIGNATURE: u64 = 1_000;

/// Flat cost units charged per atomic transaction
pub const TX_FIXED_COST: u64 = 10_000;

/// Cost in gas units of an atomic transaction: one unit per serialized
/// byte, plus the per-signature and fixed charges
pub fn transaction_cost(tx: &UnsignedTx) -> u64 {
    let byte_cost = tx.bytes().len() as u64;
    let sig_cost = tx.signature_slots() as u64 * COST_PER_SIGNATURE;
    byte_cost + sig_cost + TX_FIXED_COST
}

/// Fee in nanoFLR for an atomic transaction at the given base fee
/// (also nanoFLR per cost unit)
pub fn estimate_fee(tx: &UnsignedTx, base_fee: u64) -> u64 {
    transaction_cost(tx).saturating_mul(base_fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::{ContractExportTx, EvmInput, TransferOutput};
    use crate::ids::ChainId;

    fn export_with_input_amount(amount: u64) -> UnsignedTx {
        UnsignedTx::ContractExport(ContractExportTx {
            network_id: 114,
            blockchain_id: ChainId([1u8; 32]),
            destination_chain: ChainId([0u8; 32]),
            inputs: vec![EvmInput {
                address: [2u8; 20],
                amount,
                asset_id: ChainId([3u8; 32]),
                nonce: 0,
            }],
            exported_outputs: vec![TransferOutput {
                asset_id: ChainId([3u8; 32]),
                amount: 1_000_000_000,
                locktime: 0,
                threshold: 1,
                addresses: vec![[4u8; 20]],
            }],
        })
    }

    #[test]
    fn test_cost_includes_fixed_and_signature_charges() {
        let tx = export_with_input_amount(1_000_000_000);
        let cost = transaction_cost(&tx);
        assert_eq!(
            cost,
            tx.bytes().len() as u64 + COST_PER_SIGNATURE + TX_FIXED_COST
        );
    }

    #[test]
    fn test_cost_is_stable_across_amount_changes() {
        // Amounts are fixed-width on the wire, so changing the fee baked
        // into an input cannot change the cost of the rebuilt transaction.
        let a = transaction_cost(&export_with_input_amount(1_000_000_000));
        let b = transaction_cost(&export_with_input_amount(u64::MAX));
        assert_eq!(a, b);
    }

    #[test]
    fn test_estimate_scales_with_base_fee() {
        let tx = export_with_input_amount(1_000_000_000);
        let cost = transaction_cost(&tx);
        assert_eq!(estimate_fee(&tx, 0), 0);
        assert_eq!(estimate_fee(&tx, 25), cost * 25);
    }

    #[test]
    fn test_estimate_saturates() {
        let tx = export_with_input_amount(1);
        assert_eq!(estimate_fee(&tx, u64::MAX), u64::MAX);
    }
}
