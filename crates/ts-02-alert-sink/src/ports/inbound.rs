//! Driving Ports (API - Inbound)

use crate::domain::Notification;
use crate::error::SinkResult;
use crate::ports::outbound::TxReceipt;
use async_trait::async_trait;
use shared_types::{AlertEvent, Coordinates};

/// Outcome of a best-effort remote write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteRecordOutcome {
    Recorded(TxReceipt),
    /// Not attempted, e.g. no wallet identity.
    Skipped(String),
    /// Attempted and failed; `category` is the ledger error label.
    Failed { category: &'static str, reason: String },
}

/// Alert sink API used by the monitor bridge and the feed.
#[async_trait]
pub trait AlertSinkApi: Send + Sync {
    /// Store locally and publish. Never fails.
    fn notify(&self, alert: AlertEvent) -> uuid::Uuid;

    /// Best-effort ledger write. Errors are logged and returned as values.
    async fn record_remote(&self, message: &str, position: Option<Coordinates>)
        -> RemoteRecordOutcome;

    fn notifications(&self) -> Vec<Notification>;

    fn unread_count(&self) -> usize;

    fn mark_all_read(&self);

    fn clear(&self);
}

/// Emergency SOS.
#[async_trait]
pub trait EmergencyApi: Send + Sync {
    /// Record an SOS on the ledger and wait for the receipt.
    async fn send_sos(&self, position: Option<Coordinates>) -> SinkResult<TxReceipt>;
}
