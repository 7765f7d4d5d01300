//! flare-keys: key encodings, address derivation, and identity resolution
//!
//! Everything here is pure: no I/O, no global state. The address codec maps
//! secp256k1 public keys to the two ledger address forms (EIP-55 hex for the
//! contract chain, bech32 for the platform chain); the identity resolver
//! reconciles whatever key material the caller supplies into one consistent
//! key pair, failing loudly on any mismatch.

pub mod address;
pub mod encoding;
pub mod identity;

pub use address::{
    bech32_address, bech32_payload, canonical_public_key_hex, decode_public_key, eth_address,
    private_key_to_eth_address, public_key_coordinates, to_checksum_address,
};
pub use encoding::{cb58_decode, cb58_encode, strip_0x};
pub use identity::{resolve_identity, Identity};
