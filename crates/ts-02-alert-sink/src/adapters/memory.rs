//! In-memory ledger that records every call.

use crate::error::{LedgerError, LedgerResult};
use crate::ports::outbound::{AlertCall, LedgerClient, TxReceipt};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Default)]
pub struct InMemoryLedger {
    calls: Mutex<Vec<AlertCall>>,
    failure: Mutex<Option<LedgerError>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submission fails with `error` until [`succeed`](Self::succeed).
    pub fn failing(error: LedgerError) -> Self {
        let ledger = Self::default();
        ledger.fail_with(error);
        ledger
    }

    pub fn fail_with(&self, error: LedgerError) {
        *self.failure.lock() = Some(error);
    }

    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    /// Calls received so far, including failed ones.
    pub fn calls(&self) -> Vec<AlertCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit_alert(&self, call: AlertCall) -> LedgerResult<TxReceipt> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(call);
            calls.len() as u64
        };
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        Ok(TxReceipt {
            tx_hash: format!("0x{index:064x}"),
            block_number: Some(index),
        })
    }
}
