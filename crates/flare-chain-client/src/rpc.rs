//! JSON-RPC 2.0 transport shared by both chain clients

use flarebridge_core::ChainError;
use serde_json::{json, Value};

/// Default timeout for node API calls (30 seconds).
/// Long enough for slow nodes, short enough to avoid perpetual spinners.
const NODE_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// A JSON-RPC endpoint bound to a single url
#[derive(Debug, Clone)]
pub struct RpcEndpoint {
    http: reqwest::Client,
    url: String,
}

impl RpcEndpoint {
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a single call and return its `result` value. A JSON-level
    /// `error` member becomes [`ChainError::Rpc`].
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        tracing::debug!(url = %self.url, method, "rpc call");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = timed_request(method, async {
            self.http
                .post(&self.url)
                .json(&body)
                .send()
                .await
                .map_err(|e| ChainError::Transport {
                    message: format!("{}: {e}", self.url),
                })?
                .json::<Value>()
                .await
                .map_err(|e| ChainError::Transport {
                    message: format!("{method}: {e}"),
                })
        })
        .await?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            tracing::warn!(method, %message, "rpc error");
            return Err(ChainError::Rpc {
                method: method.to_string(),
                message,
            });
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::MalformedResponse {
                context: method.to_string(),
                reason: "missing result".to_string(),
            })
    }
}

async fn timed_request<T>(
    method: &str,
    fut: impl std::future::Future<Output = Result<T, ChainError>>,
) -> Result<T, ChainError> {
    tokio::time::timeout(NODE_REQUEST_TIMEOUT, fut)
        .await
        .map_err(|_| {
            tracing::warn!(method, "rpc call timed out");
            ChainError::Timeout {
                seconds: NODE_REQUEST_TIMEOUT.as_secs(),
            }
        })?
}
