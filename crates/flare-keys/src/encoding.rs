//! cb58 and hex key encodings
//!
//! cb58 is base58 over `payload || last-4-bytes-of-sha256(payload)`. The raw
//! hex and cb58 forms of a private key are losslessly interconvertible.

use flarebridge_core::KeyError;
use sha2::{Digest, Sha256};

/// Drop an optional "0x" prefix
pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Encode bytes as cb58 (base58 with a 4-byte sha256 checksum suffix)
pub fn cb58_encode(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    let mut buf = Vec::with_capacity(payload.len() + 4);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&digest[28..]);
    bs58::encode(buf).into_string()
}

/// Decode a cb58 string, verifying its checksum
pub fn cb58_decode(encoded: &str) -> Result<Vec<u8>, KeyError> {
    let raw = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| KeyError::InvalidEncoding(format!("bad base58: {e}")))?;
    if raw.len() < 4 {
        return Err(KeyError::InvalidEncoding("cb58 payload too short".to_string()));
    }
    let (payload, checksum) = raw.split_at(raw.len() - 4);
    let digest = Sha256::digest(payload);
    if checksum != &digest[28..] {
        return Err(KeyError::InvalidEncoding("cb58 checksum mismatch".to_string()));
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_0x() {
        assert_eq!(strip_0x("0xabc"), "abc");
        assert_eq!(strip_0x("abc"), "abc");
    }

    #[test]
    fn test_cb58_known_vector() {
        // 32 zero bytes is the platform chain's blockchain id
        assert_eq!(cb58_encode(&[0u8; 32]), "11111111111111111111111111111111LpoYY");
    }

    #[test]
    fn test_cb58_private_key_vector() {
        let key = hex::decode("8c3b2f2d6d0e1a4f5b6c7d8e9f0a1b2c3d4e5f60718293a4b5c6d7e8f9012345")
            .unwrap();
        let encoded = cb58_encode(&key);
        assert_eq!(encoded, "24m21t5NrfLotRz62xZCYScCoJWYQJmRXU9foDYvwGMqeZGLet");
        assert_eq!(cb58_decode(&encoded).unwrap(), key);
    }

    #[test]
    fn test_cb58_rejects_bad_checksum() {
        let mut encoded = cb58_encode(b"hello");
        // Flip the final character to corrupt the checksum
        let last = encoded.pop().unwrap();
        encoded.push(if last == '1' { '2' } else { '1' });
        assert!(cb58_decode(&encoded).is_err());
    }

    #[test]
    fn test_cb58_rejects_short_input() {
        assert!(cb58_decode("11").is_err());
    }
}
