//! # ts-03-alert-feed
//!
//! Listens for the ledger contract's `ZoneAlert` and `AlertEvent` events and
//! turns them into in-app alerts.
//!
//! ```text
//! eth_getLogs ──→ JsonRpcLogSource ─┐
//!                                   ├─ChainEvent──→ AlertFeed ──AlertEvent──→ AlertForwarder
//! mpsc sender ──→ ChannelEventSource┘
//! ```
//!
//! User alerts carry identity documents (home address, phone, national id,
//! passport). Those fields are decoded so the event parses, and dropped in
//! the mapping.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    event_channel, ChainEventSender, ChannelEventSource, JsonRpcLogSource, LogPollConfig,
};
pub use domain::{
    event_topic_hex, ChainEvent, UserAlertLog, ZoneAlertLog, USER_ALERT_SIGNATURE,
    ZONE_ALERT_SIGNATURE,
};
pub use error::{FeedError, FeedResult};
pub use ports::{AlertForwarder, ChainEventSource};
pub use service::AlertFeed;
