//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports each subsystem declares.
//!
//! ```text
//! ts-01 GeofenceMonitor ──AlertSink──→ MonitorAlertSink ──→ ts-02 AlertDispatcher
//! ts-03 AlertFeed ──AlertForwarder──→ FeedForwarder ──────→ ts-02 AlertDispatcher
//! ts-01 / ts-04 ──LocationProvider──→ SimulatedLocation (fed by command lines)
//! ```

pub mod alert_sink;
pub mod location;

pub use alert_sink::{FeedForwarder, MonitorAlertSink};
pub use location::SimulatedLocation;
