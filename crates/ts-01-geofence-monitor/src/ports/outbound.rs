//! Driven Ports (outbound dependencies)

use crate::error::ProviderError;
use async_trait::async_trait;
use shared_types::{AlertEvent, Coordinates, GeofenceRegion, PermissionScope, PermissionStatus, RegionId};

/// OS location facility.
///
/// Enter/exit callbacks do not flow through this trait; the adapter delivers
/// them to [`crate::GeofenceMonitor::on_raw_signal`].
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask the user for a location permission.
    async fn request_permission(
        &self,
        scope: PermissionScope,
    ) -> Result<PermissionStatus, ProviderError>;

    /// Register the regions for OS-level enter/exit monitoring.
    async fn start_monitoring(&self, regions: &[GeofenceRegion]) -> Result<(), ProviderError>;

    /// Deregister all regions.
    async fn stop_monitoring(&self) -> Result<(), ProviderError>;
}

/// Request to persist an alert on the remote ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteAlertRequest {
    pub message: String,
    pub region_id: RegionId,
    /// Latest known fix, if any.
    pub position: Option<Coordinates>,
}

/// How a remote write ended. Informational only; failures never reach the
/// monitor's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteWriteOutcome {
    Recorded { tx_hash: String },
    Skipped { reason: String },
    Failed { reason: String },
}

impl RemoteWriteOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recorded { .. } => "recorded",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Where geofence alerts go.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a local alert. Called while the monitor holds its state lock,
    /// so implementations must not call back into the monitor.
    fn notify(&self, alert: AlertEvent);

    /// Persist an alert remotely. Errors are absorbed by the implementation.
    async fn record_remote(&self, request: RemoteAlertRequest) -> RemoteWriteOutcome;
}
