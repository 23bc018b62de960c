//! Contract log source polling a JSON-RPC node.
//!
//! Each round asks for the head block and fetches `ZoneAlert`/`AlertEvent`
//! logs from the cursor up to it with `eth_getLogs`. Without a configured
//! start block the first round only records the head, so only events mined
//! after start-up are delivered.
//!
//! Node failures are logged and retried on the next round; the source itself
//! never closes.

use crate::domain::{
    decode_log, event_topic_hex, ChainEvent, USER_ALERT_SIGNATURE, ZONE_ALERT_SIGNATURE,
};
use crate::error::{FeedError, FeedResult};
use crate::metrics;
use crate::ports::ChainEventSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::WalletAddress;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Node and polling settings.
#[derive(Clone, Debug)]
pub struct LogPollConfig {
    pub rpc_url: String,
    pub contract_address: WalletAddress,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// First block to scan. `None` starts after the current head.
    pub start_block: Option<u64>,
}

impl LogPollConfig {
    pub fn new(rpc_url: impl Into<String>, contract_address: WalletAddress) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract_address,
            poll_interval: Duration::from_secs(4),
            request_timeout: Duration::from_secs(10),
            start_block: None,
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
struct RpcLog {
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
    #[serde(default)]
    removed: bool,
}

fn to_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

fn parse_quantity(value: &Value) -> FeedResult<u64> {
    value
        .as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
        .ok_or_else(|| FeedError::Rpc {
            code: 0,
            message: format!("expected a hex quantity, got {value}"),
        })
}

/// Polls contract logs and yields decoded events.
pub struct JsonRpcLogSource {
    http: reqwest::Client,
    config: LogPollConfig,
    topics: Vec<String>,
    next_id: u64,
    cursor: Option<u64>,
    pending: VecDeque<ChainEvent>,
}

impl JsonRpcLogSource {
    pub fn new(config: LogPollConfig) -> FeedResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            cursor: config.start_block,
            config,
            topics: vec![
                event_topic_hex(ZONE_ALERT_SIGNATURE),
                event_topic_hex(USER_ALERT_SIGNATURE),
            ],
            next_id: 1,
            pending: VecDeque::new(),
        })
    }

    async fn call(&mut self, method: &str, params: Value) -> FeedResult<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id,
            method,
            params,
        };
        self.next_id += 1;

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
            return Err(FeedError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// One poll round. Returns the number of events queued.
    async fn poll(&mut self) -> FeedResult<usize> {
        let head = parse_quantity(&self.call("eth_blockNumber", json!([])).await?)?;
        let Some(from) = self.cursor else {
            info!(head, "[ts-03] Watching contract logs from next block");
            self.cursor = Some(head + 1);
            return Ok(0);
        };
        if from > head {
            return Ok(0);
        }

        let filter = json!({
            "address": self.config.contract_address.to_string(),
            "fromBlock": to_quantity(from),
            "toBlock": to_quantity(head),
            "topics": [self.topics.clone()],
        });
        let logs: Vec<RpcLog> =
            serde_json::from_value(self.call("eth_getLogs", json!([filter])).await?)?;
        self.cursor = Some(head + 1);

        let mut queued = 0;
        for log in logs.into_iter().filter(|log| !log.removed) {
            match decode_log(&log.topics, &log.data) {
                Ok(event) => {
                    self.pending.push_back(event);
                    queued += 1;
                }
                Err(e) => warn!(error = %e, "[ts-03] Skipping undecodable contract log"),
            }
        }
        debug!(from, to = head, queued, "[ts-03] Contract logs polled");
        Ok(queued)
    }
}

#[async_trait]
impl ChainEventSource for JsonRpcLogSource {
    async fn next_event(&mut self) -> Option<ChainEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            match self.poll().await {
                Ok(queued) => {
                    metrics::record_log_poll("ok");
                    if queued > 0 {
                        continue;
                    }
                }
                Err(e) => {
                    metrics::record_log_poll("error");
                    warn!(error = %e, rpc_url = %self.config.rpc_url, "[ts-03] Contract log poll failed");
                }
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
