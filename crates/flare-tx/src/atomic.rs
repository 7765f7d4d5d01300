//! Atomic transaction structures and their serialized forms
//!
//! Five transaction kinds cover the cross-chain surface: export/import on
//! the contract chain (account-model inputs, dynamic fees) and
//! export/import/delegate on the platform chain (UTXO inputs, fixed fees).
//! The fee is never a field; it is whatever the inputs exceed the outputs
//! by, so a different fee means a different transaction.

use sha2::{Digest, Sha256};

use crate::codec::Writer;
use crate::ids::ChainId;

pub const CODEC_VERSION: u16 = 0;

// Wire type ids
const TYPE_CONTRACT_IMPORT: u32 = 0;
const TYPE_CONTRACT_EXPORT: u32 = 1;
const TYPE_SECP_TRANSFER_INPUT: u32 = 5;
const TYPE_SECP_TRANSFER_OUTPUT: u32 = 7;
const TYPE_SECP_CREDENTIAL: u32 = 9;
const TYPE_SECP_OUTPUT_OWNERS: u32 = 11;
const TYPE_ADD_DELEGATOR: u32 = 12;
const TYPE_PLATFORM_IMPORT: u32 = 17;
const TYPE_PLATFORM_EXPORT: u32 = 18;

/// A spendable output fetched from a node's UTXO set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub tx_id: ChainId,
    pub output_index: u32,
    pub asset_id: ChainId,
    pub amount: u64,
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<[u8; 20]>,
}

/// Account-model input on the contract chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmInput {
    pub address: [u8; 20],
    pub amount: u64,
    pub asset_id: ChainId,
    pub nonce: u64,
}

/// Account-model output on the contract chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmOutput {
    pub address: [u8; 20],
    pub amount: u64,
    pub asset_id: ChainId,
}

/// UTXO-model transferable output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutput {
    pub asset_id: ChainId,
    pub amount: u64,
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<[u8; 20]>,
}

/// UTXO-model transferable input, referencing the UTXO it consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInput {
    pub tx_id: ChainId,
    pub output_index: u32,
    pub asset_id: ChainId,
    pub amount: u64,
    pub address_indices: Vec<u32>,
}

impl TransferInput {
    pub fn from_utxo(utxo: &Utxo) -> Self {
        Self {
            tx_id: utxo.tx_id,
            output_index: utxo.output_index,
            asset_id: utxo.asset_id,
            amount: utxo.amount,
            // Single-key identities sign with the first owner slot
            address_indices: vec![0],
        }
    }
}

/// Ownership descriptor for staking rewards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOwners {
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<[u8; 20]>,
}

/// Export from the contract chain to the platform chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractExportTx {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    pub destination_chain: ChainId,
    pub inputs: Vec<EvmInput>,
    pub exported_outputs: Vec<TransferOutput>,
}

/// Import onto the contract chain of funds exported from the platform chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractImportTx {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    pub source_chain: ChainId,
    pub imported_inputs: Vec<TransferInput>,
    pub outputs: Vec<EvmOutput>,
}

/// Import onto the platform chain of funds exported from the contract chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformImportTx {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    pub outputs: Vec<TransferOutput>,
    pub memo: Vec<u8>,
    pub source_chain: ChainId,
    pub imported_inputs: Vec<TransferInput>,
}

/// Export from the platform chain to the contract chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformExportTx {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    /// Change back to the sender
    pub outputs: Vec<TransferOutput>,
    pub inputs: Vec<TransferInput>,
    pub memo: Vec<u8>,
    pub destination_chain: ChainId,
    pub exported_outputs: Vec<TransferOutput>,
}

/// Stake delegation to a validator on the platform chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDelegatorTx {
    pub network_id: u32,
    pub blockchain_id: ChainId,
    pub outputs: Vec<TransferOutput>,
    pub inputs: Vec<TransferInput>,
    pub memo: Vec<u8>,
    pub node_id: [u8; 20],
    pub start_time: u64,
    pub end_time: u64,
    pub stake_amount: u64,
    pub stake_outputs: Vec<TransferOutput>,
    pub rewards_owner: OutputOwners,
}

/// An unsigned transaction, ready for fee estimation or signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedTx {
    ContractExport(ContractExportTx),
    ContractImport(ContractImportTx),
    PlatformImport(PlatformImportTx),
    PlatformExport(PlatformExportTx),
    AddDelegator(AddDelegatorTx),
}

fn write_transfer_output(w: &mut Writer, out: &TransferOutput) {
    w.bytes(out.asset_id.as_bytes());
    w.u32(TYPE_SECP_TRANSFER_OUTPUT);
    w.u64(out.amount);
    w.u64(out.locktime);
    w.u32(out.threshold);
    w.array(&out.addresses, |w, addr| w.bytes(addr));
}

fn write_transfer_input(w: &mut Writer, input: &TransferInput) {
    w.bytes(input.tx_id.as_bytes());
    w.u32(input.output_index);
    w.bytes(input.asset_id.as_bytes());
    w.u32(TYPE_SECP_TRANSFER_INPUT);
    w.u64(input.amount);
    w.array(&input.address_indices, |w, idx| w.u32(*idx));
}

impl UnsignedTx {
    /// Deterministic serialized form
    pub fn bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.u16(CODEC_VERSION);
        match self {
            UnsignedTx::ContractExport(tx) => {
                w.u32(TYPE_CONTRACT_EXPORT);
                w.u32(tx.network_id);
                w.bytes(tx.blockchain_id.as_bytes());
                w.bytes(tx.destination_chain.as_bytes());
                w.array(&tx.inputs, |w, input| {
                    w.bytes(&input.address);
                    w.u64(input.amount);
                    w.bytes(input.asset_id.as_bytes());
                    w.u64(input.nonce);
                });
                w.array(&tx.exported_outputs, write_transfer_output);
            }
            UnsignedTx::ContractImport(tx) => {
                w.u32(TYPE_CONTRACT_IMPORT);
                w.u32(tx.network_id);
                w.bytes(tx.blockchain_id.as_bytes());
                w.bytes(tx.source_chain.as_bytes());
                w.array(&tx.imported_inputs, write_transfer_input);
                w.array(&tx.outputs, |w, out| {
                    w.bytes(&out.address);
                    w.u64(out.amount);
                    w.bytes(out.asset_id.as_bytes());
                });
            }
            UnsignedTx::PlatformImport(tx) => {
                w.u32(TYPE_PLATFORM_IMPORT);
                w.u32(tx.network_id);
                w.bytes(tx.blockchain_id.as_bytes());
                w.array(&tx.outputs, write_transfer_output);
                w.array(&[] as &[TransferInput], write_transfer_input);
                w.var_bytes(&tx.memo);
                w.bytes(tx.source_chain.as_bytes());
                w.array(&tx.imported_inputs, write_transfer_input);
            }
            UnsignedTx::PlatformExport(tx) => {
                w.u32(TYPE_PLATFORM_EXPORT);
                w.u32(tx.network_id);
                w.bytes(tx.blockchain_id.as_bytes());
                w.array(&tx.outputs, write_transfer_output);
                w.array(&tx.inputs, write_transfer_input);
                w.var_bytes(&tx.memo);
                w.bytes(tx.destination_chain.as_bytes());
                w.array(&tx.exported_outputs, write_transfer_output);
            }
            UnsignedTx::AddDelegator(tx) => {
                w.u32(TYPE_ADD_DELEGATOR);
                w.u32(tx.network_id);
                w.bytes(tx.blockchain_id.as_bytes());
                w.array(&tx.outputs, write_transfer_output);
                w.array(&tx.inputs, write_transfer_input);
                w.var_bytes(&tx.memo);
                w.bytes(&tx.node_id);
                w.u64(tx.start_time);
                w.u64(tx.end_time);
                w.u64(tx.stake_amount);
                w.array(&tx.stake_outputs, write_transfer_output);
                w.u32(TYPE_SECP_OUTPUT_OWNERS);
                w.u64(tx.rewards_owner.locktime);
                w.u32(tx.rewards_owner.threshold);
                w.array(&tx.rewards_owner.addresses, |w, addr| w.bytes(addr));
            }
        }
        w.finish()
    }

    /// sha256 of the serialized transaction, the message each signer signs
    pub fn signing_hash(&self) -> [u8; 32] {
        Sha256::digest(self.bytes()).into()
    }

    /// Number of signatures a well-formed signed form carries
    pub fn signature_slots(&self) -> usize {
        match self {
            UnsignedTx::ContractExport(tx) => tx.inputs.len(),
            UnsignedTx::ContractImport(tx) => tx.imported_inputs.len(),
            UnsignedTx::PlatformImport(tx) => tx.imported_inputs.len(),
            UnsignedTx::PlatformExport(tx) => tx.inputs.len(),
            UnsignedTx::AddDelegator(tx) => tx.inputs.len(),
        }
    }

    /// Number of value-carrying inputs consumed
    pub fn input_count(&self) -> usize {
        self.signature_slots()
    }
}

/// A signed transaction: the unsigned form plus one 65-byte recoverable
/// secp256k1 signature per slot
#[derive(Debug, Clone)]
pub struct SignedTx {
    pub unsigned: UnsignedTx,
    pub signatures: Vec<[u8; 65]>,
}

impl SignedTx {
    /// Serialized form for broadcast: unsigned bytes plus credentials
    pub fn bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.bytes(&self.unsigned.bytes());
        w.array(&self.signatures, |w, sig| {
            w.u32(TYPE_SECP_CREDENTIAL);
            w.u32(1);
            w.bytes(sig.as_slice());
        });
        w.finish()
    }
}
