//! JSON-RPC connection to a cluster node

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::RPC_TIMEOUT_SECS;
use crate::error::RpcError;
use crate::wallet::pubkey::{Hash, Pubkey, Signature};

/// Network boundary used by the App and the wallet provider
#[async_trait]
pub trait Connection: Send + Sync {
    /// Raw balance in lamports
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Submit a serialized, signed transaction
    async fn send_transaction(&self, tx: &[u8]) -> Result<Signature, RpcError>;
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
}

/// HTTP JSON-RPC client
pub struct RpcConnection {
    client: reqwest::Client,
    url: String,
    commitment: String,
    next_id: AtomicU64,
}

impl RpcConnection {
    pub fn new(url: impl Into<String>, commitment: impl Into<String>) -> Self {
        RpcConnection {
            client: create_client(),
            url: url.into(),
            commitment: commitment.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(id, method, url = %self.url, "RPC call");
        let resp: RpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        parse_rpc_response(resp)
    }
}

fn parse_rpc_response<T>(resp: RpcResponse<T>) -> Result<T, RpcError> {
    if let Some(err) = resp.error {
        return Err(RpcError::Node {
            code: err.code,
            message: err.message,
        });
    }
    resp.result
        .ok_or_else(|| RpcError::MalformedResponse("missing result".to_string()))
}

#[async_trait]
impl Connection for RpcConnection {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        let ctx: WithContext<u64> = self
            .call(
                "getBalance",
                json!([pubkey.to_string(), { "commitment": self.commitment }]),
            )
            .await?;
        Ok(ctx.value)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let ctx: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;
        Ok(ctx.value.blockhash.parse()?)
    }

    async fn send_transaction(&self, tx: &[u8]) -> Result<Signature, RpcError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(tx);
        let sig: String = self
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "preflightCommitment": self.commitment,
                }]),
            )
            .await?;
        Ok(sig.parse()?)
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(RPC_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
