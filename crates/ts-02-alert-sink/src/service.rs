//! Alert Sink services
//!
//! [`AlertDispatcher`] is the single entry point for alerts: it stores them in
//! the notification centre, publishes them on the bus and performs the
//! best-effort ledger write. [`EmergencyAlerter`] sends the SOS.

use crate::domain::{CoordinateEncoding, Notification, NotificationCenter};
use crate::error::{LedgerError, SinkError, SinkResult};
use crate::metrics;
use crate::ports::inbound::{AlertSinkApi, EmergencyApi, RemoteRecordOutcome};
use crate::ports::outbound::{AlertCall, LedgerClient, TxReceipt};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::EventPublisher;
use shared_types::{AlertEvent, Coordinates, IdentityProvider};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Ledger message recorded by an SOS.
pub const SOS_MESSAGE: &str = "EMERGENCY SOS - Immediate assistance required";

/// Routes alerts to the notification list, the bus and the ledger.
pub struct AlertDispatcher {
    notifications: Mutex<NotificationCenter>,
    publisher: Arc<dyn EventPublisher>,
    ledger: Option<Arc<dyn LedgerClient>>,
    identity: Arc<dyn IdentityProvider>,
    encoding: CoordinateEncoding,
}

impl AlertDispatcher {
    /// `ledger == None` disables remote writes.
    pub fn new(
        capacity: usize,
        publisher: Arc<dyn EventPublisher>,
        ledger: Option<Arc<dyn LedgerClient>>,
        identity: Arc<dyn IdentityProvider>,
        encoding: CoordinateEncoding,
    ) -> Self {
        Self {
            notifications: Mutex::new(NotificationCenter::new(capacity)),
            publisher,
            ledger,
            identity,
            encoding,
        }
    }

    pub fn encoding(&self) -> CoordinateEncoding {
        self.encoding
    }
}

#[async_trait]
impl AlertSinkApi for AlertDispatcher {
    fn notify(&self, alert: AlertEvent) -> Uuid {
        info!(
            category = %alert.category,
            title = %alert.title,
            "[ts-02] Alert: {}",
            alert.message
        );
        let id = self.notifications.lock().push(alert.clone());
        let receivers = self.publisher.publish(alert);
        metrics::record_notification_stored();
        tracing::debug!(%id, receivers, "[ts-02] Alert stored and published");
        id
    }

    async fn record_remote(
        &self,
        message: &str,
        position: Option<Coordinates>,
    ) -> RemoteRecordOutcome {
        let Some(user) = self.identity.wallet_address() else {
            warn!("[ts-02] Not authenticated; skipping on-chain alert");
            metrics::record_ledger_write("skipped");
            return RemoteRecordOutcome::Skipped("not authenticated".to_string());
        };
        let Some(ledger) = &self.ledger else {
            metrics::record_ledger_write("skipped");
            return RemoteRecordOutcome::Skipped("ledger disabled".to_string());
        };

        let (latitude, longitude) = self.encoding.encode(position);
        let call = AlertCall {
            message: message.to_string(),
            user,
            latitude,
            longitude,
        };

        match ledger.submit_alert(call).await {
            Ok(receipt) => {
                info!(tx_hash = %receipt.tx_hash, "[ts-02] Alert recorded on ledger");
                metrics::record_ledger_write("recorded");
                RemoteRecordOutcome::Recorded(receipt)
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "[ts-02] Failed to record alert on ledger");
                metrics::record_ledger_write(e.category());
                RemoteRecordOutcome::Failed {
                    category: e.category(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().snapshot()
    }

    fn unread_count(&self) -> usize {
        self.notifications.lock().unread_count()
    }

    fn mark_all_read(&self) {
        self.notifications.lock().mark_all_read();
    }

    fn clear(&self) {
        self.notifications.lock().clear();
    }
}

/// Sends the emergency SOS and reports categorised failures.
pub struct EmergencyAlerter {
    ledger: Option<Arc<dyn LedgerClient>>,
    identity: Arc<dyn IdentityProvider>,
    encoding: CoordinateEncoding,
}

impl EmergencyAlerter {
    pub fn new(
        ledger: Option<Arc<dyn LedgerClient>>,
        identity: Arc<dyn IdentityProvider>,
        encoding: CoordinateEncoding,
    ) -> Self {
        Self {
            ledger,
            identity,
            encoding,
        }
    }
}

#[async_trait]
impl EmergencyApi for EmergencyAlerter {
    async fn send_sos(&self, position: Option<Coordinates>) -> SinkResult<TxReceipt> {
        let user = self
            .identity
            .wallet_address()
            .ok_or(LedgerError::NotAuthenticated)?;
        let position = position.ok_or(SinkError::LocationUnavailable)?;
        let ledger = self
            .ledger
            .as_ref()
            .ok_or_else(|| LedgerError::Unavailable("ledger disabled".to_string()))?;

        let (latitude, longitude) = self.encoding.encode(Some(position));
        let call = AlertCall {
            message: SOS_MESSAGE.to_string(),
            user,
            latitude,
            longitude,
        };

        match ledger.submit_alert(call).await {
            Ok(receipt) => {
                info!(
                    tx_hash = %receipt.tx_hash,
                    position = %position,
                    "[ts-02] Emergency alert recorded on ledger"
                );
                metrics::record_sos("sent");
                Ok(receipt)
            }
            Err(e) => {
                error!(category = e.category(), error = %e, "[ts-02] Emergency alert failed");
                metrics::record_sos(e.category());
                Err(e.into())
            }
        }
    }
}
