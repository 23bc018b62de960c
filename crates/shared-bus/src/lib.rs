//! # Shared Bus - Alert Bus for Screen/Controller Fan-out
//!
//! Every `AlertEvent` produced by the geofence monitor, the chain feed or the
//! SOS path is published here once. Interested parties (notification badge,
//! map overlay, logging) subscribe with a category filter.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Alert Sink   │    publish()       │ Screen       │
//! │ Dispatcher   │ ──────┐            │ Controller   │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Alert Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Ownership
//!
//! - The bus is an explicit object owned by whoever wires the subsystems; there
//!   is no global emitter.
//! - A `Subscription` owns its receiver and unsubscribes when dropped.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::EventFilter;
pub use publisher::{AlertBus, EventPublisher};
pub use subscriber::Subscription;

/// Maximum alerts to buffer per subscriber before the slowest one lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
