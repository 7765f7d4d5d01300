//! Chain, asset, and validator identifiers

use std::fmt;

use flarebridge_core::TxError;
use flare_keys::{cb58_decode, cb58_encode};

/// A 32-byte chain or asset identifier, displayed in cb58
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub [u8; 32]);

impl ChainId {
    /// The platform chain's well-known all-zero identifier,
    /// "11111111111111111111111111111111LpoYY" in cb58
    pub const PLATFORM: ChainId = ChainId([0u8; 32]);

    pub fn from_cb58(encoded: &str) -> Result<Self, TxError> {
        let bytes = cb58_decode(encoded).map_err(|e| TxError::InvalidId(e.to_string()))?;
        let id: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TxError::InvalidId(format!("{encoded}: not 32 bytes")))?;
        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", cb58_encode(&self.0))
    }
}

/// A validator node identifier ("NodeID-" + cb58 of 20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub [u8; 20]);

impl NodeId {
    pub fn parse(encoded: &str) -> Result<Self, TxError> {
        let bare = encoded
            .strip_prefix("NodeID-")
            .ok_or_else(|| TxError::InvalidNodeId(format!("{encoded}: missing NodeID- prefix")))?;
        let bytes = cb58_decode(bare).map_err(|e| TxError::InvalidNodeId(e.to_string()))?;
        let id: [u8; 20] = bytes
            .try_into()
            .map_err(|_| TxError::InvalidNodeId(format!("{encoded}: not 20 bytes")))?;
        Ok(Self(id))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeID-{}", cb58_encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_round_trip() {
        let encoded = "11111111111111111111111111111111LpoYY";
        let id = ChainId::from_cb58(encoded).unwrap();
        assert_eq!(id.as_bytes(), &[0u8; 32]);
        assert_eq!(id.to_string(), encoded);
    }

    #[test]
    fn test_chain_id_rejects_wrong_length() {
        let encoded = cb58_encode(&[1u8; 20]);
        assert!(ChainId::from_cb58(&encoded).is_err());
    }

    #[test]
    fn test_node_id_round_trip() {
        let raw = [7u8; 20];
        let encoded = format!("NodeID-{}", cb58_encode(&raw));
        let node = NodeId::parse(&encoded).unwrap();
        assert_eq!(node.0, raw);
        assert_eq!(node.to_string(), encoded);
    }

    #[test]
    fn test_node_id_requires_prefix() {
        let encoded = cb58_encode(&[7u8; 20]);
        assert!(NodeId::parse(&encoded).is_err());
    }
}
