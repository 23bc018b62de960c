//! Driven Ports (outbound dependencies)

use crate::error::LedgerResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::WalletAddress;

/// One call of the contract's alert function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCall {
    pub message: String,
    /// Sender and the `user` argument.
    pub user: WalletAddress,
    pub latitude: i64,
    pub longitude: i64,
}

/// Mined transaction summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// Remote append-only ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit the call and wait until it is mined.
    async fn submit_alert(&self, call: AlertCall) -> LedgerResult<TxReceipt>;
}
