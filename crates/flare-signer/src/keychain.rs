//! In-process signing with a resolved identity's private key

use async_trait::async_trait;
use flare_keys::Identity;
use flare_tx::{SignedTx, UnsignedTx};
use k256::ecdsa::SigningKey;

use crate::errors::SignerError;
use crate::TxSigner;

/// Signs with a locally held key. Signatures are recoverable secp256k1
/// over the transaction's signing hash, one copy per credential slot
/// since a single key owns every input.
#[derive(Debug)]
pub struct KeychainSigner {
    key: SigningKey,
}

impl KeychainSigner {
    pub fn new(identity: &Identity) -> Result<Self, SignerError> {
        let key = identity
            .signing_key()
            .map_err(|e| SignerError::Signing(e.to_string()))?
            .ok_or(SignerError::MissingKey)?;
        Ok(Self { key })
    }
}

#[async_trait]
impl TxSigner for KeychainSigner {
    async fn sign(&self, tx: &UnsignedTx) -> Result<SignedTx, SignerError> {
        let hash = tx.signing_hash();
        let (signature, recovery) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let mut slot = [0u8; 65];
        slot[..64].copy_from_slice(&signature.to_bytes());
        slot[64] = recovery.to_byte();
        Ok(SignedTx {
            unsigned: tx.clone(),
            signatures: vec![slot; tx.signature_slots()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_keys::resolve_identity;
    use flare_tx::{ChainId, ContractExportTx, EvmInput, TransferOutput};
    use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    const KEY: &str = "8c3b2f2d6d0e1a4f5b6c7d8e9f0a1b2c3d4e5f60718293a4b5c6d7e8f9012345";

    fn sample_tx() -> UnsignedTx {
        UnsignedTx::ContractExport(ContractExportTx {
            network_id: 114,
            blockchain_id: ChainId([1u8; 32]),
            destination_chain: ChainId::PLATFORM,
            inputs: vec![EvmInput {
                address: [2u8; 20],
                amount: 1_000_350_000,
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

    #[tokio::test]
    async fn test_signature_recovers_to_signing_key() {
        let identity = resolve_identity("costwo", None, Some(KEY), None).unwrap();
        let signer = KeychainSigner::new(&identity).unwrap();
        let tx = sample_tx();
        let signed = signer.sign(&tx).await.unwrap();
        assert_eq!(signed.signatures.len(), 1);

        let slot = signed.signatures[0];
        let signature = Signature::from_slice(&slot[..64]).unwrap();
        let recovery = RecoveryId::from_byte(slot[64]).unwrap();
        let recovered =
            VerifyingKey::recover_from_prehash(&tx.signing_hash(), &signature, recovery).unwrap();
        assert_eq!(
            recovered.to_encoded_point(true),
            identity.public_key.to_encoded_point(true)
        );
    }

    #[tokio::test]
    async fn test_public_only_identity_cannot_build_keychain() {
        let identity = resolve_identity("costwo", None, Some(KEY), None)
            .unwrap()
            .without_private_key();
        let err = KeychainSigner::new(&identity).unwrap_err();
        assert!(matches!(err, SignerError::MissingKey));
    }
}
