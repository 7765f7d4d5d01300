//! Contract-chain JSON-RPC client
//!
//! Talks to two endpoints on the same node: the avax API for atomic-memory
//! queries and broadcast, and the eth API for base fee and nonce.

use async_trait::async_trait;
use flarebridge_core::{ChainError, NetworkConfig, TxId};
use flare_tx::Utxo;
use serde_json::{json, Value};

use crate::chain::ContractChain;
use crate::responses;
use crate::rpc::RpcEndpoint;

#[derive(Debug, Clone)]
pub struct ContractRpcClient {
    avax: RpcEndpoint,
    eth: RpcEndpoint,
}

impl ContractRpcClient {
    pub fn new(network: &NetworkConfig) -> Self {
        let base = network.base_url();
        Self {
            avax: RpcEndpoint::new(format!("{base}/ext/bc/C/avax")),
            eth: RpcEndpoint::new(network.rpc_url()),
        }
    }
}

fn tx_id_from(result: &Value, context: &str) -> Result<TxId, ChainError> {
    result
        .get("txID")
        .and_then(Value::as_str)
        .map(TxId::new)
        .ok_or_else(|| ChainError::MalformedResponse {
            context: context.to_string(),
            reason: "missing txID".to_string(),
        })
}

#[async_trait]
impl ContractChain for ContractRpcClient {
    async fn base_fee(&self) -> Result<u64, ChainError> {
        let result = self.eth.call("eth_baseFee", json!([])).await?;
        let wei = responses::parse_hex_quantity(&result, "eth_baseFee")?;
        Ok(responses::wei_to_nanoflr(wei))
    }

    async fn transaction_count(&self, address: &str) -> Result<u64, ChainError> {
        let result = self
            .eth
            .call("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        let count = responses::parse_hex_quantity(&result, "eth_getTransactionCount")?;
        u64::try_from(count).map_err(|_| ChainError::MalformedResponse {
            context: "eth_getTransactionCount".to_string(),
            reason: "count exceeds u64".to_string(),
        })
    }

    async fn fetch_utxos(
        &self,
        addresses: &[String],
        source_chain: &str,
    ) -> Result<Vec<Utxo>, ChainError> {
        let result = self
            .avax
            .call(
                "avax.getUTXOs",
                json!({
                    "addresses": addresses,
                    "sourceChain": source_chain,
                    "encoding": "hex",
                }),
            )
            .await?;
        responses::parse_utxos(&result, "avax.getUTXOs")
    }

    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<TxId, ChainError> {
        let result = self
            .avax
            .call(
                "avax.issueTx",
                json!({
                    "tx": responses::encode_checksummed_hex(tx_bytes),
                    "encoding": "hex",
                }),
            )
            .await?;
        tx_id_from(&result, "avax.issueTx")
    }
}
