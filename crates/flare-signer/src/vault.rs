//! External approval signing
//!
//! The vault holds the key. We submit the signing hash, a human or policy
//! engine approves or denies the request on the vault side, and we poll
//! until the outcome is known or the deadline passes. The four approval
//! outcomes map to distinct errors so callers can tell a denial from a
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use flare_tx::{SignedTx, UnsignedTx};
use serde_json::{json, Value};

use crate::errors::SignerError;
use crate::TxSigner;

const DEFAULT_PATH: &str = "/api/v1/transactions";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub base_url: String,
    pub vault_id: String,
    /// Request path under the base url
    pub path: String,
    pub poll_interval: Duration,
    pub approval_timeout: Duration,
}

impl VaultConfig {
    pub fn new(base_url: impl Into<String>, vault_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            vault_id: vault_id.into(),
            path: DEFAULT_PATH.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            approval_timeout: DEFAULT_APPROVAL_TIMEOUT,
        }
    }
}

/// Where an approval request currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved(Vec<[u8; 65]>),
    Denied(String),
    Expired,
}

pub struct VaultSigner {
    config: VaultConfig,
    http: reqwest::Client,
}

impl VaultSigner {
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url, self.config.path)
    }

    /// Submit an unsigned transaction for approval, returning the
    /// vault-side request id.
    pub async fn submit(&self, tx: &UnsignedTx) -> Result<String, SignerError> {
        let body = json!({
            "vault_id": self.config.vault_id,
            "signer_type": "api_signer",
            "type": "black_box_signature",
            "details": {
                "format": "hash",
                "hash": hex::encode(tx.signing_hash()),
            },
            "note": format!("{} signature(s) over atomic transaction", tx.signature_slots()),
        });
        let response: Value = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| SignerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| SignerError::Transport(e.to_string()))?;
        let id = response
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SignerError::MalformedResponse("submit: missing id".to_string()))?;
        tracing::info!(request_id = id, "vault approval requested");
        Ok(id.to_string())
    }

    /// Fetch the current status of a submitted request
    pub async fn status(&self, request_id: &str) -> Result<ApprovalStatus, SignerError> {
        let response: Value = self
            .http
            .get(format!("{}/{request_id}", self.endpoint()))
            .send()
            .await
            .map_err(|e| SignerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| SignerError::Transport(e.to_string()))?;
        parse_status(&response)
    }

    /// Submit, then poll until the vault settles the request or the
    /// approval deadline passes.
    pub async fn sign_tx(&self, tx: &UnsignedTx) -> Result<SignedTx, SignerError> {
        let request_id = self.submit(tx).await?;
        let deadline = tokio::time::Instant::now() + self.config.approval_timeout;
        loop {
            match self.status(&request_id).await? {
                ApprovalStatus::Pending => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(SignerError::ApprovalTimeout {
                            seconds: self.config.approval_timeout.as_secs(),
                        });
                    }
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                ApprovalStatus::Approved(signatures) => {
                    return assemble(tx, signatures);
                }
                ApprovalStatus::Denied(reason) => {
                    return Err(SignerError::ApprovalDenied { reason });
                }
                ApprovalStatus::Expired => return Err(SignerError::ApprovalExpired),
            }
        }
    }
}

/// Map a vault response body onto an approval status
fn parse_status(body: &Value) -> Result<ApprovalStatus, SignerError> {
    let state = body
        .get("state")
        .and_then(Value::as_str)
        .ok_or_else(|| SignerError::MalformedResponse("status: missing state".to_string()))?;
    match state {
        "pending" | "waiting_for_approval" => Ok(ApprovalStatus::Pending),
        "approved" | "completed" => {
            let entries = body
                .get("signatures")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    SignerError::MalformedResponse("status: missing signatures".to_string())
                })?;
            let mut signatures = Vec::with_capacity(entries.len());
            for entry in entries {
                let encoded = entry.as_str().ok_or_else(|| {
                    SignerError::MalformedResponse("status: signature is not a string".to_string())
                })?;
                let bytes = hex::decode(encoded.strip_prefix("0x").unwrap_or(encoded))
                    .map_err(|e| SignerError::MalformedResponse(format!("status: {e}")))?;
                let slot: [u8; 65] = bytes.try_into().map_err(|_| {
                    SignerError::MalformedResponse("status: signature is not 65 bytes".to_string())
                })?;
                signatures.push(slot);
            }
            Ok(ApprovalStatus::Approved(signatures))
        }
        "aborted" | "denied" => {
            let reason = body
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given")
                .to_string();
            Ok(ApprovalStatus::Denied(reason))
        }
        "expired" => Ok(ApprovalStatus::Expired),
        other => Err(SignerError::MalformedResponse(format!(
            "status: unknown state {other}"
        ))),
    }
}

/// The vault signs the hash once; the credential layout still needs one
/// copy per slot, the same replication the keychain performs.
fn assemble(tx: &UnsignedTx, signatures: Vec<[u8; 65]>) -> Result<SignedTx, SignerError> {
    let slots = tx.signature_slots();
    let filled = match signatures.len() {
        1 => vec![signatures[0]; slots],
        n if n == slots => signatures,
        n => {
            return Err(SignerError::MalformedResponse(format!(
                "expected 1 or {slots} signatures, got {n}"
            )))
        }
    };
    Ok(SignedTx {
        unsigned: tx.clone(),
        signatures: filled,
    })
}

#[async_trait]
impl TxSigner for VaultSigner {
    async fn sign(&self, tx: &UnsignedTx) -> Result<SignedTx, SignerError> {
        self.sign_tx(tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_tx::{ChainId, ContractImportTx, TransferInput};

    fn two_input_tx() -> UnsignedTx {
        let input = |byte: u8| TransferInput {
            tx_id: ChainId([byte; 32]),
            output_index: 0,
            asset_id: ChainId([3u8; 32]),
            amount: 100,
            address_indices: vec![0],
        };
        UnsignedTx::ContractImport(ContractImportTx {
            network_id: 114,
            blockchain_id: ChainId([1u8; 32]),
            source_chain: ChainId::PLATFORM,
            imported_inputs: vec![input(1), input(2)],
            outputs: vec![],
        })
    }

    #[test]
    fn test_parse_pending_and_expired() {
        assert_eq!(
            parse_status(&json!({ "state": "pending" })).unwrap(),
            ApprovalStatus::Pending
        );
        assert_eq!(
            parse_status(&json!({ "state": "expired" })).unwrap(),
            ApprovalStatus::Expired
        );
    }

    #[test]
    fn test_parse_approved_signatures() {
        let sig = hex::encode([7u8; 65]);
        let status = parse_status(&json!({
            "state": "approved",
            "signatures": [sig],
        }))
        .unwrap();
        assert_eq!(status, ApprovalStatus::Approved(vec![[7u8; 65]]));
    }

    #[test]
    fn test_parse_denied_carries_reason() {
        let status = parse_status(&json!({
            "state": "aborted",
            "reason": "policy violation",
        }))
        .unwrap();
        assert_eq!(status, ApprovalStatus::Denied("policy violation".to_string()));
    }

    #[test]
    fn test_parse_rejects_short_signature() {
        let err = parse_status(&json!({
            "state": "approved",
            "signatures": [hex::encode([7u8; 64])],
        }))
        .unwrap_err();
        assert!(matches!(err, SignerError::MalformedResponse(_)));
    }

    #[test]
    fn test_assemble_replicates_single_signature() {
        let tx = two_input_tx();
        let signed = assemble(&tx, vec![[9u8; 65]]).unwrap();
        assert_eq!(signed.signatures, vec![[9u8; 65]; 2]);
    }

    #[test]
    fn test_assemble_rejects_wrong_count() {
        let tx = two_input_tx();
        let err = assemble(&tx, vec![[9u8; 65]; 3]).unwrap_err();
        assert!(matches!(err, SignerError::MalformedResponse(_)));
    }
}
