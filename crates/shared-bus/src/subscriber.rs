//! # Subscriptions
//!
//! A [`Subscription`] owns its broadcast receiver; dropping it unsubscribes.

use crate::events::EventFilter;
use shared_types::AlertEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// Receiving side of one subscriber.
pub struct Subscription {
    receiver: broadcast::Receiver<AlertEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<AlertEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next alert passing the filter, or `None` once the bus is gone.
    ///
    /// A lagging subscriber loses the alerts it fell behind on and carries on
    /// with the oldest one still buffered.
    pub async fn recv(&mut self) -> Option<AlertEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Alert subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
