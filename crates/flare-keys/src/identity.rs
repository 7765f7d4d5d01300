//! Identity resolution: reconcile supplied key material into one key pair
//!
//! The caller may hand us a public key, a private key in either encoding, or
//! any combination. Whatever arrives must agree with itself: a supplied
//! public key has to match the one derived from a supplied private key, and
//! the contract-chain address derived through the public-key path has to
//! match the ledger's direct key-to-address derivation.

use flarebridge_core::KeyError;
use k256::ecdsa::SigningKey;
use k256::PublicKey;

use crate::address::{
    bech32_address, canonical_public_key_hex, decode_public_key, eth_address,
    private_key_to_eth_address, public_key_coordinates,
};
use crate::encoding::{cb58_decode, cb58_encode, strip_0x};

/// A reconciled key pair with its derived ledger addresses.
///
/// Immutable once resolved. `public_key` is always present; the private-key
/// fields are present only when the caller supplied a private key, in which
/// case both encodings are populated.
#[derive(Debug, Clone)]
pub struct Identity {
    pub private_key_hex: Option<String>,
    pub private_key_cb58: Option<String>,
    pub public_key: PublicKey,
    /// Checksummed contract-chain address ("0x…")
    pub c_address_hex: String,
    /// Contract-chain bech32 address ("C-{hrp}1…"), used for atomic UTXOs
    pub c_address_bech32: String,
    /// Platform-chain bech32 address ("P-{hrp}1…")
    pub p_address_bech32: String,
}

impl Identity {
    /// Whether this identity can sign locally
    pub fn can_sign(&self) -> bool {
        self.private_key_hex.is_some()
    }

    /// The in-process signing key, when a private key was supplied
    pub fn signing_key(&self) -> Result<Option<SigningKey>, KeyError> {
        match &self.private_key_hex {
            None => Ok(None),
            Some(hex_key) => Ok(Some(parse_private_key(hex_key)?)),
        }
    }

    /// An identity stripped of private-key material, for external signing
    pub fn without_private_key(&self) -> Identity {
        Identity {
            private_key_hex: None,
            private_key_cb58: None,
            ..self.clone()
        }
    }

    /// Canonical "04…" hex form of the public key
    pub fn public_key_hex(&self) -> String {
        canonical_public_key_hex(&self.public_key)
    }
}

fn parse_private_key(hex_key: &str) -> Result<SigningKey, KeyError> {
    let bytes = hex::decode(strip_0x(hex_key))
        .map_err(|e| KeyError::InvalidPrivateKey(format!("bad hex: {e}")))?;
    if bytes.len() != 32 {
        return Err(KeyError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    SigningKey::from_slice(&bytes)
        .map_err(|_| KeyError::InvalidPrivateKey("not a valid scalar".to_string()))
}

/// Resolve supplied key material into a consistent [`Identity`].
///
/// At least one of the three key arguments must be present; supplying none
/// fails with [`KeyError::NoKeyMaterial`] rather than fabricating a
/// placeholder address. When both a public and a private key arrive, their
/// curve points must be bit-equal ([`KeyError::KeyMismatch`]), and the
/// derived contract-chain address is cross-checked against the direct
/// private-key derivation ([`KeyError::AddressMismatch`]).
pub fn resolve_identity(
    hrp: &str,
    public_key: Option<&str>,
    private_key_hex: Option<&str>,
    private_key_cb58: Option<&str>,
) -> Result<Identity, KeyError> {
    // Normalize empty strings away; callers often pass through blank config
    let public_key = public_key.filter(|s| !s.is_empty());
    let private_key_hex = private_key_hex.filter(|s| !s.is_empty());
    let private_key_cb58 = private_key_cb58.filter(|s| !s.is_empty());

    // Derive the missing private-key encoding from whichever was supplied
    let (private_key_hex, private_key_cb58) = match (private_key_hex, private_key_cb58) {
        (Some(hex_key), _) => {
            let bare = strip_0x(hex_key).to_string();
            let bytes = hex::decode(&bare)
                .map_err(|e| KeyError::InvalidPrivateKey(format!("bad hex: {e}")))?;
            let encoded = cb58_encode(&bytes);
            (Some(bare), Some(encoded))
        }
        (None, Some(cb58_key)) => {
            let bytes = cb58_decode(cb58_key)?;
            (Some(hex::encode(bytes)), Some(cb58_key.to_string()))
        }
        (None, None) => (None, None),
    };

    // Decode a supplied public key and remember its coordinates for the
    // mismatch check below
    let supplied_public = public_key.map(decode_public_key).transpose()?;

    let (resolved_public, signing_key) = match &private_key_hex {
        Some(hex_key) => {
            let key = parse_private_key(hex_key)?;
            let derived: PublicKey = key.verifying_key().into();
            if let Some(supplied) = &supplied_public {
                if public_key_coordinates(supplied) != public_key_coordinates(&derived) {
                    return Err(KeyError::KeyMismatch);
                }
            }
            (derived, Some(key))
        }
        None => match supplied_public {
            Some(public) => (public, None),
            None => return Err(KeyError::NoKeyMaterial),
        },
    };

    let c_address_hex = eth_address(&resolved_public);
    let address = bech32_address(&resolved_public, hrp)?;

    // When a private key is present, the ledger's own key-to-address
    // derivation must agree with the public-key path
    if let Some(key) = &signing_key {
        let direct = private_key_to_eth_address(key);
        if direct != c_address_hex {
            return Err(KeyError::AddressMismatch {
                derived: c_address_hex,
                expected: direct,
            });
        }
    }

    Ok(Identity {
        private_key_hex,
        private_key_cb58,
        public_key: resolved_public,
        c_address_hex,
        c_address_bech32: format!("C-{address}"),
        p_address_bech32: format!("P-{address}"),
    })
}
