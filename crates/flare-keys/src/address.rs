//! Address codec: public key to ledger address forms and back
//!
//! Contract-chain addresses are Keccak-derived 20-byte hex with the EIP-55
//! mixed-case checksum. Platform-chain addresses are bech32 over
//! ripemd160(sha256(compressed-public-key)) with the network's hrp.

use bech32::{Bech32, Hrp};
use flarebridge_core::KeyError;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::encoding::strip_0x;

/// Decode a hex-encoded public key (compressed or uncompressed, optional 0x)
pub fn decode_public_key(encoded: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(strip_0x(encoded))
        .map_err(|e| KeyError::InvalidPublicKey(format!("bad hex: {e}")))?;
    PublicKey::from_sec1_bytes(&bytes)
        .map_err(|_| KeyError::InvalidPublicKey("not a valid secp256k1 point".to_string()))
}

/// The affine (x, y) coordinates of a public key
pub fn public_key_coordinates(public_key: &PublicKey) -> ([u8; 32], [u8; 32]) {
    let point = public_key.to_encoded_point(false);
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    // Uncompressed encoding always carries both coordinates
    x.copy_from_slice(point.x().expect("uncompressed point has x"));
    y.copy_from_slice(point.y().expect("uncompressed point has y"));
    (x, y)
}

/// Canonical string form: "04" followed by both coordinates in hex
pub fn canonical_public_key_hex(public_key: &PublicKey) -> String {
    hex::encode(public_key.to_encoded_point(false).as_bytes())
}

/// Apply the EIP-55 mixed-case checksum to a 20-byte address
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let digest = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Contract-chain hex address of a public key (checksummed)
pub fn eth_address(public_key: &PublicKey) -> String {
    let point = public_key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    to_checksum_address(&address)
}

/// Contract-chain hex address derived straight from a private key.
///
/// Same derivation as [`eth_address`], but through the signing key; the
/// identity resolver uses it to cross-check the public-key path.
pub fn private_key_to_eth_address(key: &SigningKey) -> String {
    eth_address(&key.verifying_key().into())
}

/// Platform-style bech32 address of a public key with the given hrp
pub fn bech32_address(public_key: &PublicKey, hrp: &str) -> Result<String, KeyError> {
    let compressed = public_key.to_encoded_point(true);
    let payload = Ripemd160::digest(Sha256::digest(compressed.as_bytes()));
    let hrp = Hrp::parse(hrp).map_err(|e| KeyError::InvalidEncoding(format!("bad hrp: {e}")))?;
    bech32::encode::<Bech32>(hrp, &payload)
        .map_err(|e| KeyError::InvalidEncoding(format!("bech32 encode: {e}")))
}

/// Decode a bech32 address back to its 20-byte payload.
///
/// Accepts an optional chain qualifier ("C-" or "P-") in front of the
/// address, as produced by the identity resolver.
pub fn bech32_payload(address: &str) -> Result<[u8; 20], KeyError> {
    let bare = address
        .strip_prefix("C-")
        .or_else(|| address.strip_prefix("P-"))
        .unwrap_or(address);
    let (_, data) = bech32::decode(bare)
        .map_err(|e| KeyError::InvalidEncoding(format!("bech32 decode: {e}")))?;
    let payload: [u8; 20] = data
        .try_into()
        .map_err(|_| KeyError::InvalidEncoding("bech32 payload is not 20 bytes".to_string()))?;
    Ok(payload)
}
