//! JSON-RPC ledger client.
//!
//! Signing is delegated to the node: the call goes out as
//! `eth_sendTransaction` from the user's account, then the receipt is polled
//! with `eth_getTransactionReceipt` until mined or timed out.

use crate::domain::{encode_alert_call, to_hex_data};
use crate::error::{LedgerError, LedgerResult};
use crate::ports::outbound::{AlertCall, LedgerClient, TxReceipt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::WalletAddress;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for the ledger node.
#[derive(Clone, Debug)]
pub struct JsonRpcConfig {
    pub rpc_url: String,
    pub contract_address: WalletAddress,
    pub request_timeout: Duration,
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl JsonRpcConfig {
    pub fn new(rpc_url: impl Into<String>, contract_address: WalletAddress) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract_address,
            request_timeout: Duration::from_secs(10),
            receipt_timeout: Duration::from_secs(120),
            receipt_poll_interval: Duration::from_millis(2000),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn parse_hex_u64(value: &str) -> Option<u64> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).ok()
}

/// Ledger client speaking Ethereum JSON-RPC over HTTP.
pub struct JsonRpcLedgerClient {
    http: reqwest::Client,
    config: JsonRpcConfig,
    next_id: AtomicU64,
}

impl JsonRpcLedgerClient {
    pub fn new(config: JsonRpcConfig) -> LedgerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &JsonRpcConfig {
        &self.config
    }

    async fn call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "[ts-02] JSON-RPC request");

        let response: RpcResponse = self
            .http
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(LedgerError::from_rpc(error.code, &error.message));
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn poll_receipt(&self, tx_hash: &str) -> LedgerResult<TxReceipt> {
        loop {
            let value = self
                .call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if value.is_null() {
                tokio::time::sleep(self.config.receipt_poll_interval).await;
                continue;
            }

            let receipt: RpcReceipt = serde_json::from_value(value).map_err(|e| LedgerError::Rpc {
                code: 0,
                message: format!("malformed receipt: {e}"),
            })?;
            if receipt.status.as_deref() == Some("0x0") {
                return Err(LedgerError::Reverted {
                    reason: format!("transaction {} failed", receipt.transaction_hash),
                });
            }
            return Ok(TxReceipt {
                tx_hash: receipt.transaction_hash,
                block_number: receipt.block_number.as_deref().and_then(parse_hex_u64),
            });
        }
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn submit_alert(&self, call: AlertCall) -> LedgerResult<TxReceipt> {
        let data = encode_alert_call(&call.message, &call.user, call.latitude, call.longitude);
        let tx = json!({
            "from": call.user.to_string(),
            "to": self.config.contract_address.to_string(),
            "data": to_hex_data(&data),
        });

        let tx_hash = self
            .call("eth_sendTransaction", json!([tx]))
            .await?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LedgerError::Rpc {
                code: 0,
                message: "eth_sendTransaction returned no hash".to_string(),
            })?;
        info!(tx_hash = %tx_hash, "[ts-02] Alert transaction submitted");

        match tokio::time::timeout(self.config.receipt_timeout, self.poll_receipt(&tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::ReceiptTimeout { tx_hash }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x1b4"), Some(436));
        assert_eq!(parse_hex_u64("0x"), None);
    }

    #[test]
    fn test_receipt_deserialize() {
        let receipt: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x10",
            "status": "0x1"
        }))
        .unwrap();
        assert_eq!(receipt.transaction_hash, "0xabc");
        assert_eq!(receipt.block_number.as_deref().and_then(parse_hex_u64), Some(16));
    }

    #[test]
    fn test_request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_sendTransaction",
            params: json!([]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "eth_sendTransaction");
    }
}
