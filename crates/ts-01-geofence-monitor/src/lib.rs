//! # ts-01-geofence-monitor
//!
//! Turns raw OS geofence callbacks into alerts.
//!
//! ## Overview
//!
//! - **Debounced membership**: one `MonitorState` per region; repeated enter or
//!   exit callbacks are no-ops.
//! - **Scoped reminder**: while inside, a `PeriodicTask` re-emits the entry
//!   alert every interval. The task lives inside the region state and is
//!   aborted on exit, on stop, and when the monitor is dropped.
//! - **Best-effort ledger writes**: remote writes are spawned and never awaited
//!   by signal handling; their failures cannot touch membership.
//!
//! ## Architecture
//!
//! ```text
//! LocationProvider ──(region, Enter|Exit)──→ GeofenceMonitor
//!                                                 │
//!                                                 ├── notify(AlertEvent) ──→ AlertSink
//!                                                 │
//!                                                 └── record_remote(..) ──→ AlertSink (spawned)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ts_01_geofence_monitor::{GeofenceMonitor, GeofenceMonitorApi, GeofenceSignal, MonitorConfig};
//!
//! let monitor = GeofenceMonitor::new(MonitorConfig::default(), provider, sink);
//! monitor.start(regions).await?;
//!
//! // From the OS callback:
//! monitor.on_raw_signal(&region_id, GeofenceSignal::Enter);
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{
    distance_to_boundary_m, haversine_distance_m, AlertTemplates, AlertTrigger, GeofenceSignal,
    Transition, EARTH_RADIUS_M,
};
pub use error::{MonitorError, MonitorResult, ProviderError};
pub use ports::inbound::{GeofenceMonitorApi, RegionStatus, SignalOutcome};
pub use ports::outbound::{AlertSink, LocationProvider, RemoteAlertRequest, RemoteWriteOutcome};
pub use service::{GeofenceMonitor, MonitorConfig};
