//! Alert Feed service

use crate::domain::ChainEvent;
use crate::error::{FeedError, FeedResult};
use crate::metrics;
use crate::ports::{AlertForwarder, ChainEventSource};
use shared_types::AlertEvent;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Maps contract events to alerts and forwards them.
pub struct AlertFeed {
    forwarder: Arc<dyn AlertForwarder>,
}

impl AlertFeed {
    pub fn new(forwarder: Arc<dyn AlertForwarder>) -> Self {
        Self { forwarder }
    }

    /// Map and forward one event. Returns the alert that was forwarded.
    pub fn handle_event(&self, event: &ChainEvent) -> AlertEvent {
        let alert = event.to_alert();
        debug!(event = event.name(), title = %alert.title, "[ts-03] Chain event mapped");
        metrics::record_event_mapped(event.name());
        self.forwarder.forward(alert.clone());
        alert
    }

    /// Decode a JSON-encoded event and handle it.
    pub fn handle_json(&self, raw: &str) -> FeedResult<AlertEvent> {
        let event: ChainEvent = serde_json::from_str(raw)?;
        Ok(self.handle_event(&event))
    }

    /// Drain `source` until it closes or `shutdown` flips to true.
    ///
    /// Returns the number of events handled, or `SourceClosed` if the source
    /// ended on its own.
    pub async fn run<S>(&self, mut source: S, mut shutdown: watch::Receiver<bool>) -> FeedResult<u64>
    where
        S: ChainEventSource,
    {
        info!("[ts-03] Alert feed started");
        let mut handled = 0u64;

        loop {
            if *shutdown.borrow() {
                info!(handled, "[ts-03] Shutdown signal received");
                return Ok(handled);
            }

            tokio::select! {
                event = source.next_event() => match event {
                    Some(event) => {
                        self.handle_event(&event);
                        handled += 1;
                    }
                    None => {
                        info!(handled, "[ts-03] Event source closed");
                        return Err(FeedError::SourceClosed);
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        info!(handled, "[ts-03] Shutdown channel dropped");
                        return Ok(handled);
                    }
                }
            }
        }
    }
}
