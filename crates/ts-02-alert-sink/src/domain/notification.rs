//! In-app notification list.
//!
//! Newest first, capped; the oldest entry falls off when full.

use serde::Serialize;
use shared_types::{AlertEvent, DEFAULT_NOTIFICATION_CAPACITY};
use std::collections::VecDeque;
use uuid::Uuid;

/// A stored alert with its generated id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(flatten)]
    pub alert: AlertEvent,
}

/// Bounded, newest-first notification list with an unread counter.
#[derive(Debug)]
pub struct NotificationCenter {
    entries: VecDeque<Notification>,
    capacity: usize,
    unread: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

impl NotificationCenter {
    /// A zero capacity is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            unread: 0,
        }
    }

    /// Store an alert at the front. Returns the generated id.
    pub fn push(&mut self, alert: AlertEvent) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push_front(Notification { id, alert });
        self.entries.truncate(self.capacity);
        self.unread = (self.unread + 1).min(self.capacity);
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn mark_all_read(&mut self) {
        self.unread = 0;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.unread = 0;
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.front()
    }

    /// Copy of every entry, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AlertCategory;

    fn alert(n: usize) -> AlertEvent {
        AlertEvent::new(AlertCategory::Zone, format!("t{n}"), "m")
    }

    #[test]
    fn test_newest_first() {
        let mut center = NotificationCenter::default();
        center.push(alert(1));
        center.push(alert(2));
        let titles: Vec<_> = center.snapshot().into_iter().map(|n| n.alert.title).collect();
        assert_eq!(titles, vec!["t2", "t1"]);
    }

    #[test]
    fn test_capped_at_capacity() {
        let mut center = NotificationCenter::default();
        for n in 0..150 {
            center.push(alert(n));
        }
        assert_eq!(center.len(), 100);
        assert_eq!(center.latest().unwrap().alert.title, "t149");
        assert_eq!(center.snapshot().last().unwrap().alert.title, "t50");
    }

    #[test]
    fn test_unique_ids() {
        let mut center = NotificationCenter::new(10);
        let a = center.push(alert(1));
        let b = center.push(alert(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_unread_and_clear() {
        let mut center = NotificationCenter::new(3);
        for n in 0..2 {
            center.push(alert(n));
        }
        assert_eq!(center.unread_count(), 2);
        center.mark_all_read();
        assert_eq!(center.unread_count(), 0);
        assert_eq!(center.len(), 2);
        center.push(alert(9));
        center.clear();
        assert!(center.is_empty());
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_serialized_entry_is_flat() {
        let mut center = NotificationCenter::new(1);
        center.push(alert(1));
        let json = serde_json::to_value(center.latest().unwrap()).unwrap();
        assert!(json.get("id").is_some());
        assert_eq!(json["title"], "t1");
        assert_eq!(json["category"], "zone");
    }
}
