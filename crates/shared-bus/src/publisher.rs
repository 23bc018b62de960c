//! # Alert Bus
//!
//! A `tokio::sync::broadcast` channel carrying every delivered alert.
//! Publishing never blocks; a subscriber that falls more than
//! [`DEFAULT_CHANNEL_CAPACITY`] alerts behind skips the oldest ones.

use crate::events::EventFilter;
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use shared_types::AlertEvent;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Publishing side of the bus, as seen by the alert dispatcher.
pub trait EventPublisher: Send + Sync {
    /// Publish an alert. Returns how many subscriptions it reached; zero when
    /// nobody is listening.
    fn publish(&self, event: AlertEvent) -> usize;
}

/// In-process alert bus.
pub struct AlertBus {
    sender: broadcast::Sender<AlertEvent>,
}

impl AlertBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to alerts matching `filter`, starting with the next publish.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(categories = ?filter.categories, "Alert subscription opened");
        Subscription::new(self.sender.subscribe(), filter)
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for AlertBus {
    fn publish(&self, event: AlertEvent) -> usize {
        let category = event.category;
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(%category, receivers, "Alert published");
                receivers
            }
            Err(_) => {
                trace!(%category, "Alert published with no subscribers");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AlertCategory;

    fn alert() -> AlertEvent {
        AlertEvent::new(AlertCategory::Geofence, "Restricted Area", "inside")
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = AlertBus::new();
        assert_eq!(bus.publish(alert()), 0);
    }

    #[test]
    fn test_publish_counts_every_open_subscription() {
        let bus = AlertBus::default();
        let _all = bus.subscribe(EventFilter::all());
        let _zone = bus.subscribe(EventFilter::categories(vec![AlertCategory::Zone]));

        // Filtering happens on the receiving side.
        assert_eq!(bus.publish(alert()), 2);
    }

    #[test]
    fn test_dropped_subscription_stops_counting() {
        let bus = AlertBus::new();
        let sub = bus.subscribe(EventFilter::all());
        assert_eq!(bus.publish(alert()), 1);

        drop(sub);
        assert_eq!(bus.publish(alert()), 0);
    }
}
