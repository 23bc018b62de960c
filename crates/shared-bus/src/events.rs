//! # Event Filters
//!
//! Subscribers narrow the alert stream by category.

use shared_types::{AlertCategory, AlertEvent};

/// Filter for subscribing to specific alert categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Categories to include. Empty means all categories.
    pub categories: Vec<AlertCategory>,
}

impl EventFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only `categories`. An empty list accepts everything.
    #[must_use]
    pub fn categories(categories: Vec<AlertCategory>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn matches(&self, event: &AlertEvent) -> bool {
        self.categories.is_empty() || self.categories.contains(&event.category)
    }
}
