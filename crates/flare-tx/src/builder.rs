//! Pure transaction builders
//!
//! Each builder turns explicit inputs (amounts, fees, fetched UTXOs) into an
//! UnsignedTx. Callers own the fee decision: the two-phase estimation loop in
//! the transfer pipeline builds once with a placeholder fee, prices the
//! result, and builds again with the real one.

use flarebridge_core::TxError;

use crate::atomic::{
    AddDelegatorTx, ContractExportTx, ContractImportTx, EvmInput, EvmOutput, OutputOwners,
    PlatformExportTx, PlatformImportTx, TransferInput, TransferOutput, UnsignedTx, Utxo,
};
use crate::ids::{ChainId, NodeId};

/// Export funds from the contract chain to the platform chain
#[derive(Debug, Clone)]
pub struct ContractExportRequest {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    pub destination_chain: ChainId,
    pub asset_id: ChainId,
    /// Sender account on the contract chain
    pub from_address: [u8; 20],
    /// Recipient key hash on the platform chain
    pub to_address: [u8; 20],
    pub amount: u64,
    pub fee: u64,
    pub nonce: u64,
}

/// Import exported funds onto the platform chain
#[derive(Debug, Clone)]
pub struct PlatformImportRequest<'a> {
    pub network_id: u32,
    pub source_chain: ChainId,
    pub utxos: &'a [Utxo],
    pub to_address: [u8; 20],
    pub asset_id: ChainId,
    pub fee: u64,
    /// Only UTXOs whose locktime has passed this timestamp are spendable
    pub as_of: u64,
    pub memo: Vec<u8>,
}

/// Export funds from the platform chain to the contract chain
#[derive(Debug, Clone)]
pub struct PlatformExportRequest<'a> {
    pub network_id: u32,
    pub destination_chain: ChainId,
    pub utxos: &'a [Utxo],
    pub to_address: [u8; 20],
    pub change_address: [u8; 20],
    pub asset_id: ChainId,
    pub amount: u64,
    pub fee: u64,
    pub as_of: u64,
    pub memo: Vec<u8>,
}

/// Delegate stake to a validator
#[derive(Debug, Clone)]
pub struct DelegatorRequest<'a> {
    pub network_id: u32,
    pub utxos: &'a [Utxo],
    pub asset_id: ChainId,
    pub node_id: NodeId,
    pub start_time: u64,
    pub end_time: u64,
    pub stake_amount: u64,
    /// Receives change, the stake itself, and any rewards
    pub owner_address: [u8; 20],
    pub as_of: u64,
    pub memo: Vec<u8>,
}

fn single_output(asset_id: ChainId, amount: u64, address: [u8; 20]) -> TransferOutput {
    TransferOutput {
        asset_id,
        amount,
        locktime: 0,
        threshold: 1,
        addresses: vec![address],
    }
}

/// Spendable UTXOs in canonical (tx id, output index) order
fn spendable(utxos: &[Utxo], as_of: u64) -> Vec<&Utxo> {
    let mut picked: Vec<&Utxo> = utxos.iter().filter(|u| u.locktime <= as_of).collect();
    picked.sort_by_key(|u| (*u.tx_id.as_bytes(), u.output_index));
    picked
}

fn sum_amounts(utxos: &[&Utxo]) -> Result<u64, TxError> {
    utxos.iter().try_fold(0u64, |acc, u| {
        acc.checked_add(u.amount)
            .ok_or_else(|| TxError::BuildFailed("input amount overflow".into()))
    })
}

/// Build a contract-chain export. The single input covers the exported
/// amount plus the fee; the exported output carries the amount.
pub fn build_contract_export(req: ContractExportRequest) -> Result<UnsignedTx, TxError> {
    if req.amount == 0 {
        return Err(TxError::BuildFailed("export amount must be positive".into()));
    }
    let input_amount = req
        .amount
        .checked_add(req.fee)
        .ok_or_else(|| TxError::BuildFailed("amount plus fee overflows".into()))?;
    Ok(UnsignedTx::ContractExport(ContractExportTx {
        network_id: req.network_id,
        blockchain_id: req.blockchain_id,
        destination_chain: req.destination_chain,
        inputs: vec![EvmInput {
            address: req.from_address,
            amount: input_amount,
            asset_id: req.asset_id,
            nonce: req.nonce,
        }],
        exported_outputs: vec![single_output(req.asset_id, req.amount, req.to_address)],
    }))
}

/// Build a contract-chain import that consumes every exported UTXO and
/// credits the total minus the fee to a single account.
pub fn build_contract_import(
    network_id: u32,
    blockchain_id: ChainId,
    source_chain: ChainId,
    utxos: &[Utxo],
    to_address: [u8; 20],
    fee: u64,
) -> Result<UnsignedTx, TxError> {
    if utxos.is_empty() {
        return Err(TxError::NoUtxos);
    }
    let picked = spendable(utxos, u64::MAX);
    let total = sum_amounts(&picked)?;
    if total <= fee {
        return Err(TxError::InsufficientFunds {
            required: fee,
            available: total,
        });
    }
    let asset_id = picked[0].asset_id;
    Ok(UnsignedTx::ContractImport(ContractImportTx {
        network_id,
        blockchain_id,
        source_chain,
        imported_inputs: picked.iter().map(|u| TransferInput::from_utxo(u)).collect(),
        outputs: vec![EvmOutput {
            address: to_address,
            amount: total - fee,
            asset_id,
        }],
    }))
}

/// Build a platform-chain import that consumes every spendable exported
/// UTXO and pays the total minus the fixed fee back to the owner.
pub fn build_platform_import(req: PlatformImportRequest<'_>) -> Result<UnsignedTx, TxError> {
    let picked = spendable(req.utxos, req.as_of);
    if picked.is_empty() {
        return Err(TxError::NoUtxos);
    }
    let total = sum_amounts(&picked)?;
    if total <= req.fee {
        return Err(TxError::InsufficientFunds {
            required: req.fee,
            available: total,
        });
    }
    Ok(UnsignedTx::PlatformImport(PlatformImportTx {
        network_id: req.network_id,
        blockchain_id: ChainId::PLATFORM,
        outputs: vec![single_output(req.asset_id, total - req.fee, req.to_address)],
        memo: req.memo,
        source_chain: req.source_chain,
        imported_inputs: picked.iter().map(|u| TransferInput::from_utxo(u)).collect(),
    }))
}

/// Select spendable UTXOs until they cover `target`, in canonical order.
/// Returns the selection and its total.
fn select_covering<'a>(
    utxos: &'a [Utxo],
    as_of: u64,
    target: u64,
) -> Result<(Vec<&'a Utxo>, u64), TxError> {
    let candidates = spendable(utxos, as_of);
    if candidates.is_empty() {
        return Err(TxError::NoUtxos);
    }
    let mut picked = Vec::new();
    let mut total = 0u64;
    for utxo in candidates {
        if total >= target {
            break;
        }
        total = total
            .checked_add(utxo.amount)
            .ok_or_else(|| TxError::BuildFailed("input amount overflow".into()))?;
        picked.push(utxo);
    }
    if total < target {
        return Err(TxError::InsufficientFunds {
            required: target,
            available: total,
        });
    }
    Ok((picked, total))
}

/// Build a platform-chain export. Inputs cover the amount plus the fixed
/// fee; any excess returns to the change address.
pub fn build_platform_export(req: PlatformExportRequest<'_>) -> Result<UnsignedTx, TxError> {
    if req.amount == 0 {
        return Err(TxError::BuildFailed("export amount must be positive".into()));
    }
    let target = req
        .amount
        .checked_add(req.fee)
        .ok_or_else(|| TxError::BuildFailed("amount plus fee overflows".into()))?;
    let (picked, total) = select_covering(req.utxos, req.as_of, target)?;
    let change = total - target;
    let mut outputs = Vec::new();
    if change > 0 {
        outputs.push(single_output(req.asset_id, change, req.change_address));
    }
    Ok(UnsignedTx::PlatformExport(PlatformExportTx {
        network_id: req.network_id,
        blockchain_id: ChainId::PLATFORM,
        outputs,
        inputs: picked.iter().map(|u| TransferInput::from_utxo(u)).collect(),
        memo: req.memo,
        destination_chain: req.destination_chain,
        exported_outputs: vec![single_output(req.asset_id, req.amount, req.to_address)],
    }))
}

/// Build a stake delegation. Delegation transactions carry no fee; inputs
/// cover the stake and any excess returns to the owner. The ledger checks
/// the time window, not the builder.
pub fn build_add_delegator(req: DelegatorRequest<'_>) -> Result<UnsignedTx, TxError> {
    if req.stake_amount == 0 {
        return Err(TxError::BuildFailed("stake amount must be positive".into()));
    }
    let (picked, total) = select_covering(req.utxos, req.as_of, req.stake_amount)?;
    let change = total - req.stake_amount;
    let mut outputs = Vec::new();
    if change > 0 {
        outputs.push(single_output(req.asset_id, change, req.owner_address));
    }
    Ok(UnsignedTx::AddDelegator(AddDelegatorTx {
        network_id: req.network_id,
        blockchain_id: ChainId::PLATFORM,
        outputs,
        inputs: picked.iter().map(|u| TransferInput::from_utxo(u)).collect(),
        memo: req.memo,
        node_id: req.node_id.0,
        start_time: req.start_time,
        end_time: req.end_time,
        stake_amount: req.stake_amount,
        stake_outputs: vec![single_output(req.asset_id, req.stake_amount, req.owner_address)],
        rewards_owner: OutputOwners {
            locktime: 0,
            threshold: 1,
            addresses: vec![req.owner_address],
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: ChainId = ChainId([3u8; 32]);
    const SOURCE: ChainId = ChainId([1u8; 32]);
    const OWNER: [u8; 20] = [7u8; 20];

    fn utxo(tx_byte: u8, index: u32, amount: u64) -> Utxo {
        Utxo {
            tx_id: ChainId([tx_byte; 32]),
            output_index: index,
            asset_id: ASSET,
            amount,
            locktime: 0,
            threshold: 1,
            addresses: vec![OWNER],
        }
    }

    fn locked_utxo(tx_byte: u8, amount: u64, locktime: u64) -> Utxo {
        Utxo {
            locktime,
            ..utxo(tx_byte, 0, amount)
        }
    }

    #[test]
    fn test_contract_export_input_carries_amount_plus_fee() {
        let tx = build_contract_export(ContractExportRequest {
            network_id: 114,
            blockchain_id: SOURCE,
            destination_chain: ChainId::PLATFORM,
            asset_id: ASSET,
            from_address: [2u8; 20],
            to_address: OWNER,
            amount: 1_000_000_000,
            fee: 350_000,
            nonce: 11,
        })
        .unwrap();
        let UnsignedTx::ContractExport(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].amount, 1_000_350_000);
        assert_eq!(tx.inputs[0].nonce, 11);
        assert_eq!(tx.exported_outputs[0].amount, 1_000_000_000);
    }

    #[test]
    fn test_contract_export_rejects_zero_amount() {
        let err = build_contract_export(ContractExportRequest {
            network_id: 114,
            blockchain_id: SOURCE,
            destination_chain: ChainId::PLATFORM,
            asset_id: ASSET,
            from_address: [2u8; 20],
            to_address: OWNER,
            amount: 0,
            fee: 1,
            nonce: 0,
        })
        .unwrap_err();
        assert!(matches!(err, TxError::BuildFailed(_)));
    }

    #[test]
    fn test_contract_import_consumes_all_utxos_minus_fee() {
        let utxos = vec![utxo(9, 1, 400), utxo(5, 0, 600)];
        let tx = build_contract_import(114, SOURCE, ChainId::PLATFORM, &utxos, [2u8; 20], 150)
            .unwrap();
        let UnsignedTx::ContractImport(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.imported_inputs.len(), 2);
        // canonical order is by tx id, not insertion order
        assert_eq!(tx.imported_inputs[0].tx_id, ChainId([5u8; 32]));
        assert_eq!(tx.outputs[0].amount, 850);
    }

    #[test]
    fn test_contract_import_requires_utxos() {
        let err = build_contract_import(114, SOURCE, ChainId::PLATFORM, &[], [2u8; 20], 0)
            .unwrap_err();
        assert!(matches!(err, TxError::NoUtxos));
    }

    #[test]
    fn test_contract_import_fee_must_leave_something() {
        let utxos = vec![utxo(1, 0, 100)];
        let err = build_contract_import(114, SOURCE, ChainId::PLATFORM, &utxos, [2u8; 20], 100)
            .unwrap_err();
        assert!(matches!(
            err,
            TxError::InsufficientFunds {
                required: 100,
                available: 100
            }
        ));
    }

    #[test]
    fn test_platform_import_filters_locked_utxos() {
        let utxos = vec![utxo(1, 0, 500), locked_utxo(2, 900, 2_000_000_000)];
        let tx = build_platform_import(PlatformImportRequest {
            network_id: 114,
            source_chain: SOURCE,
            utxos: &utxos,
            to_address: OWNER,
            asset_id: ASSET,
            fee: 100,
            as_of: 1_700_000_000,
            memo: Vec::new(),
        })
        .unwrap();
        let UnsignedTx::PlatformImport(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.imported_inputs.len(), 1);
        assert_eq!(tx.outputs[0].amount, 400);
    }

    #[test]
    fn test_platform_import_all_locked_is_no_utxos() {
        let utxos = vec![locked_utxo(2, 900, 2_000_000_000)];
        let err = build_platform_import(PlatformImportRequest {
            network_id: 114,
            source_chain: SOURCE,
            utxos: &utxos,
            to_address: OWNER,
            asset_id: ASSET,
            fee: 100,
            as_of: 1_700_000_000,
            memo: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, TxError::NoUtxos));
    }

    #[test]
    fn test_platform_export_returns_change() {
        let utxos = vec![utxo(1, 0, 2_000)];
        let tx = build_platform_export(PlatformExportRequest {
            network_id: 114,
            destination_chain: SOURCE,
            utxos: &utxos,
            to_address: [2u8; 20],
            change_address: OWNER,
            asset_id: ASSET,
            amount: 1_200,
            fee: 300,
            as_of: 0,
            memo: Vec::new(),
        })
        .unwrap();
        let UnsignedTx::PlatformExport(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.exported_outputs[0].amount, 1_200);
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].amount, 500);
        assert_eq!(tx.outputs[0].addresses, vec![OWNER]);
    }

    #[test]
    fn test_platform_export_exact_spend_has_no_change() {
        let utxos = vec![utxo(1, 0, 1_500)];
        let tx = build_platform_export(PlatformExportRequest {
            network_id: 114,
            destination_chain: SOURCE,
            utxos: &utxos,
            to_address: [2u8; 20],
            change_address: OWNER,
            asset_id: ASSET,
            amount: 1_200,
            fee: 300,
            as_of: 0,
            memo: Vec::new(),
        })
        .unwrap();
        let UnsignedTx::PlatformExport(tx) = tx else {
            panic!("wrong variant");
        };
        assert!(tx.outputs.is_empty());
    }

    #[test]
    fn test_platform_export_stops_selecting_once_covered() {
        let utxos = vec![utxo(1, 0, 1_000), utxo(2, 0, 1_000), utxo(3, 0, 1_000)];
        let tx = build_platform_export(PlatformExportRequest {
            network_id: 114,
            destination_chain: SOURCE,
            utxos: &utxos,
            to_address: [2u8; 20],
            change_address: OWNER,
            asset_id: ASSET,
            amount: 1_500,
            fee: 100,
            as_of: 0,
            memo: Vec::new(),
        })
        .unwrap();
        let UnsignedTx::PlatformExport(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.inputs.len(), 2);
        assert_eq!(tx.outputs[0].amount, 400);
    }

    #[test]
    fn test_platform_export_insufficient_funds_reports_totals() {
        let utxos = vec![utxo(1, 0, 1_000)];
        let err = build_platform_export(PlatformExportRequest {
            network_id: 114,
            destination_chain: SOURCE,
            utxos: &utxos,
            to_address: [2u8; 20],
            change_address: OWNER,
            asset_id: ASSET,
            amount: 2_000,
            fee: 100,
            as_of: 0,
            memo: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::InsufficientFunds {
                required: 2_100,
                available: 1_000
            }
        ));
    }

    #[test]
    fn test_add_delegator_stakes_and_returns_change() {
        let utxos = vec![utxo(1, 0, 60_000_000_000)];
        let tx = build_add_delegator(DelegatorRequest {
            network_id: 114,
            utxos: &utxos,
            asset_id: ASSET,
            node_id: NodeId([8u8; 20]),
            start_time: 1_700_000_000,
            end_time: 1_710_000_000,
            stake_amount: 50_000_000_000,
            owner_address: OWNER,
            as_of: 1_700_000_000,
            memo: Vec::new(),
        })
        .unwrap();
        let UnsignedTx::AddDelegator(tx) = tx else {
            panic!("wrong variant");
        };
        assert_eq!(tx.stake_amount, 50_000_000_000);
        assert_eq!(tx.stake_outputs[0].amount, 50_000_000_000);
        assert_eq!(tx.outputs[0].amount, 10_000_000_000);
        assert_eq!(tx.rewards_owner.addresses, vec![OWNER]);
        assert_eq!(tx.node_id, [8u8; 20]);
    }

    #[test]
    fn test_add_delegator_rejects_zero_stake() {
        let utxos = vec![utxo(1, 0, 60_000_000_000)];
        let err = build_add_delegator(DelegatorRequest {
            network_id: 114,
            utxos: &utxos,
            asset_id: ASSET,
            node_id: NodeId([8u8; 20]),
            start_time: 1_700_000_000,
            end_time: 1_710_000_000,
            stake_amount: 0,
            owner_address: OWNER,
            as_of: 0,
            memo: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, TxError::BuildFailed(_)));
    }
}
