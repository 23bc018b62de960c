//! Ports for the Alert Feed

use crate::domain::ChainEvent;
use async_trait::async_trait;
use shared_types::AlertEvent;

/// Stream of decoded contract events.
#[async_trait]
pub trait ChainEventSource: Send {
    /// Next event, or `None` once the source is closed.
    async fn next_event(&mut self) -> Option<ChainEvent>;
}

/// Destination for mapped alerts.
pub trait AlertForwarder: Send + Sync {
    fn forward(&self, alert: AlertEvent);
}
