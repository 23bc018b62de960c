//! Ports for the Geofence Monitor

pub mod inbound;
pub mod outbound;

pub use inbound::{GeofenceMonitorApi, RegionStatus, SignalOutcome};
pub use outbound::{AlertSink, LocationProvider, RemoteAlertRequest, RemoteWriteOutcome};
