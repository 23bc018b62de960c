//! Driving Ports (API - Inbound)

use crate::domain::{GeofenceSignal, Transition};
use crate::error::MonitorResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{Coordinates, GeofenceRegion, RegionId};

/// What happened to a raw signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalOutcome {
    Applied(Transition),
    /// Region not registered, or monitoring not active.
    UnknownRegion,
}

impl SignalOutcome {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            Self::Applied(t) => Some(*t),
            Self::UnknownRegion => None,
        }
    }
}

/// Point-in-time view of one region.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionStatus {
    pub region_id: RegionId,
    pub inside: bool,
    pub periodic_alert_active: bool,
    pub last_transition_at: Option<DateTime<Utc>>,
    /// Distance to the centre from the last fix.
    pub distance_m: Option<f64>,
    /// Signed distance to the boundary from the last fix, negative inside
    /// the circle.
    pub boundary_distance_m: Option<f64>,
}

/// Geofence monitor API
#[async_trait]
pub trait GeofenceMonitorApi: Send + Sync {
    /// Request permissions and begin monitoring. Restarts if already active.
    async fn start(&self, regions: Vec<GeofenceRegion>) -> MonitorResult<()>;

    /// Stop monitoring. Local state is always reset; returns false if the
    /// provider failed to deregister.
    async fn stop(&self) -> bool;

    /// Feed one OS geofence callback.
    fn on_raw_signal(&self, region_id: &RegionId, signal: GeofenceSignal) -> SignalOutcome;

    /// Feed a polled position fix. Never changes membership.
    fn on_position_fix(&self, fix: Coordinates);

    fn is_active(&self) -> bool;

    fn region_status(&self) -> Vec<RegionStatus>;
}
