//! Bridges from the monitor and the chain feed into the alert dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::AlertEvent;
use ts_01_geofence_monitor::{AlertSink, RemoteAlertRequest, RemoteWriteOutcome};
use ts_02_alert_sink::{AlertDispatcher, AlertSinkApi, RemoteRecordOutcome};
use ts_03_alert_feed::AlertForwarder;

/// Implements the monitor's [`AlertSink`] port on top of the dispatcher.
pub struct MonitorAlertSink {
    dispatcher: Arc<AlertDispatcher>,
}

impl MonitorAlertSink {
    pub fn new(dispatcher: Arc<AlertDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl AlertSink for MonitorAlertSink {
    fn notify(&self, alert: AlertEvent) {
        self.dispatcher.notify(alert);
    }

    async fn record_remote(&self, request: RemoteAlertRequest) -> RemoteWriteOutcome {
        match self
            .dispatcher
            .record_remote(&request.message, request.position)
            .await
        {
            RemoteRecordOutcome::Recorded(receipt) => RemoteWriteOutcome::Recorded {
                tx_hash: receipt.tx_hash,
            },
            RemoteRecordOutcome::Skipped(reason) => RemoteWriteOutcome::Skipped { reason },
            RemoteRecordOutcome::Failed { category, reason } => RemoteWriteOutcome::Failed {
                reason: format!("{category}: {reason}"),
            },
        }
    }
}

/// Delivers chain-feed alerts locally. They already live on the ledger, so
/// nothing is written back.
pub struct FeedForwarder {
    dispatcher: Arc<AlertDispatcher>,
}

impl FeedForwarder {
    pub fn new(dispatcher: Arc<AlertDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl AlertForwarder for FeedForwarder {
    fn forward(&self, alert: AlertEvent) {
        self.dispatcher.notify(alert);
    }
}
