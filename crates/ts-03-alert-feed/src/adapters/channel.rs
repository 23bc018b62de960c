//! In-process event source backed by an mpsc channel.
//!
//! Events decoded elsewhere (the runtime's `chain` command) are pushed
//! through the sender half.

use crate::domain::ChainEvent;
use crate::ports::ChainEventSource;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Sending half. Cloneable.
pub type ChainEventSender = mpsc::Sender<ChainEvent>;

pub struct ChannelEventSource {
    receiver: mpsc::Receiver<ChainEvent>,
}

/// Create a bounded event channel.
pub fn event_channel(capacity: usize) -> (ChainEventSender, ChannelEventSource) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (sender, ChannelEventSource { receiver })
}

#[async_trait]
impl ChainEventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<ChainEvent> {
        self.receiver.recv().await
    }
}
