//! Geofence monitor domain: transition table, per-region state, timers.

pub mod alerts;
pub mod distance;
pub mod periodic;
pub mod state;
pub mod transition;

pub use alerts::{AlertTemplates, AlertTrigger};
pub use distance::{distance_to_boundary_m, haversine_distance_m, EARTH_RADIUS_M};
pub use periodic::PeriodicTask;
pub use state::{MonitorState, TimerEpoch};
pub use transition::{GeofenceSignal, Transition};
