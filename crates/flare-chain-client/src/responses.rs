//! Eager parsing of node responses
//!
//! Node payloads use the ledger's "hex" encoding: 0x-prefixed bytes with a
//! 4-byte sha256 checksum tail. Everything is decoded into typed values at
//! the boundary; anything that does not match becomes
//! [`ChainError::MalformedResponse`] naming where it came from.

use flarebridge_core::ChainError;
use flare_tx::{ChainId, Utxo};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Balance breakdown of a platform-chain address, in nanoFLR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceResponse {
    pub unlocked: u64,
    pub locked_stakeable: u64,
    pub locked_not_stakeable: u64,
}

fn malformed(context: &str, reason: impl Into<String>) -> ChainError {
    ChainError::MalformedResponse {
        context: context.to_string(),
        reason: reason.into(),
    }
}

/// Decode a checksummed hex payload, verifying and stripping the tail
pub fn decode_checksummed_hex(encoded: &str, context: &str) -> Result<Vec<u8>, ChainError> {
    let bare = encoded.strip_prefix("0x").unwrap_or(encoded);
    let bytes = hex::decode(bare).map_err(|e| malformed(context, format!("bad hex: {e}")))?;
    if bytes.len() < 4 {
        return Err(malformed(context, "payload shorter than its checksum"));
    }
    let (payload, tail) = bytes.split_at(bytes.len() - 4);
    let digest = Sha256::digest(payload);
    if tail != &digest[28..] {
        return Err(malformed(context, "checksum mismatch"));
    }
    Ok(payload.to_vec())
}

/// Encode bytes in the node's checksummed hex form
pub fn encode_checksummed_hex(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&digest[28..]);
    format!("0x{}", hex::encode(bytes))
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Option<u32> {
        self.take(4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> Option<u64> {
        self.take(8)
            .and_then(|b| b.try_into().ok())
            .map(u64::from_be_bytes)
    }

    fn id32(&mut self) -> Option<[u8; 32]> {
        self.take(32).and_then(|b| b.try_into().ok())
    }

    fn addr20(&mut self) -> Option<[u8; 20]> {
        self.take(20).and_then(|b| b.try_into().ok())
    }

    fn done(&self) -> bool {
        self.pos == self.buf.len()
    }
}

const CODEC_VERSION: u16 = 0;
const SECP_TRANSFER_OUTPUT: u32 = 7;

fn parse_utxo_bytes(bytes: &[u8]) -> Option<Utxo> {
    let mut r = Reader::new(bytes);
    if r.u16()? != CODEC_VERSION {
        return None;
    }
    let tx_id = ChainId(r.id32()?);
    let output_index = r.u32()?;
    let asset_id = ChainId(r.id32()?);
    if r.u32()? != SECP_TRANSFER_OUTPUT {
        return None;
    }
    let amount = r.u64()?;
    let locktime = r.u64()?;
    let threshold = r.u32()?;
    let count = r.u32()? as usize;
    let mut addresses = Vec::with_capacity(count);
    for _ in 0..count {
        addresses.push(r.addr20()?);
    }
    if !r.done() {
        return None;
    }
    Some(Utxo {
        tx_id,
        output_index,
        asset_id,
        amount,
        locktime,
        threshold,
        addresses,
    })
}

/// Parse a getUTXOs result into typed UTXOs
pub fn parse_utxos(result: &Value, context: &str) -> Result<Vec<Utxo>, ChainError> {
    let entries = result
        .get("utxos")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(context, "missing utxos array"))?;
    let mut utxos = Vec::with_capacity(entries.len());
    for entry in entries {
        let encoded = entry
            .as_str()
            .ok_or_else(|| malformed(context, "utxo entry is not a string"))?;
        let bytes = decode_checksummed_hex(encoded, context)?;
        let utxo = parse_utxo_bytes(&bytes)
            .ok_or_else(|| malformed(context, format!("unparseable utxo {encoded}")))?;
        utxos.push(utxo);
    }
    Ok(utxos)
}

fn u64_field(result: &Value, field: &str, context: &str) -> Result<u64, ChainError> {
    let value = result
        .get(field)
        .ok_or_else(|| malformed(context, format!("missing {field}")))?;
    // the node serializes amounts as decimal strings
    match value {
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| malformed(context, format!("{field}: {e}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| malformed(context, format!("{field} is not a u64"))),
        _ => Err(malformed(context, format!("{field} has unexpected type"))),
    }
}

/// Parse a platform.getBalance result
pub fn parse_balance(result: &Value, context: &str) -> Result<BalanceResponse, ChainError> {
    Ok(BalanceResponse {
        unlocked: u64_field(result, "unlocked", context)?,
        locked_stakeable: u64_field(result, "lockedStakeable", context)?,
        locked_not_stakeable: u64_field(result, "lockedNotStakeable", context)?,
    })
}

/// Parse an eth-style 0x hex quantity
pub fn parse_hex_quantity(value: &Value, context: &str) -> Result<u128, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| malformed(context, "quantity is not a string"))?;
    let bare = text.strip_prefix("0x").unwrap_or(text);
    u128::from_str_radix(bare, 16).map_err(|e| malformed(context, format!("{text}: {e}")))
}

/// Convert a base fee quoted in wei to nanoFLR per cost unit
pub fn wei_to_nanoflr(wei: u128) -> u64 {
    u64::try_from(wei / 1_000_000_000).unwrap_or(u64::MAX)
}
