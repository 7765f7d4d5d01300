//! Platform-chain JSON-RPC client

use async_trait::async_trait;
use flarebridge_core::{ChainError, NetworkConfig, TxId};
use flare_tx::Utxo;
use serde_json::{json, Map, Value};

use crate::chain::PlatformChain;
use crate::responses::{self, BalanceResponse};
use crate::rpc::RpcEndpoint;

#[derive(Debug, Clone)]
pub struct PlatformRpcClient {
    endpoint: RpcEndpoint,
}

impl PlatformRpcClient {
    pub fn new(network: &NetworkConfig) -> Self {
        Self {
            endpoint: RpcEndpoint::new(format!("{}/ext/bc/P", network.base_url())),
        }
    }
}

#[async_trait]
impl PlatformChain for PlatformRpcClient {
    async fn fetch_utxos(
        &self,
        addresses: &[String],
        source_chain: Option<&str>,
    ) -> Result<Vec<Utxo>, ChainError> {
        let mut params = Map::new();
        params.insert("addresses".to_string(), json!(addresses));
        params.insert("encoding".to_string(), json!("hex"));
        if let Some(chain) = source_chain {
            params.insert("sourceChain".to_string(), json!(chain));
        }
        let result = self
            .endpoint
            .call("platform.getUTXOs", Value::Object(params))
            .await?;
        responses::parse_utxos(&result, "platform.getUTXOs")
    }

    async fn balance(&self, address: &str) -> Result<BalanceResponse, ChainError> {
        let result = self
            .endpoint
            .call("platform.getBalance", json!({ "addresses": [address] }))
            .await?;
        responses::parse_balance(&result, "platform.getBalance")
    }

    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<TxId, ChainError> {
        let result = self
            .endpoint
            .call(
                "platform.issueTx",
                json!({
                    "tx": responses::encode_checksummed_hex(tx_bytes),
                    "encoding": "hex",
                }),
            )
            .await?;
        result
            .get("txID")
            .and_then(Value::as_str)
            .map(TxId::new)
            .ok_or_else(|| ChainError::MalformedResponse {
                context: "platform.issueTx".to_string(),
                reason: "missing txID".to_string(),
            })
    }
}
