//! Simulated OS location facility.
//!
//! Stands in for the platform geofencing and background-location APIs. It
//! records what the subsystems register and serves the last fix pushed in
//! through [`SimulatedLocation::set_position`]. Enter/exit callbacks are fed
//! to the monitor directly by the command handler.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use shared_types::{Coordinates, GeofenceRegion, PermissionScope, PermissionStatus};
use ts_01_geofence_monitor::{LocationProvider, ProviderError};
use ts_04_location_tracking::{
    BackgroundLocationProvider, LocationFix, TrackingError, TrackingOptions, TrackingResult,
};

#[derive(Default)]
pub struct SimulatedLocation {
    denied: Mutex<HashSet<PermissionScope>>,
    monitored: Mutex<Vec<GeofenceRegion>>,
    position: RwLock<Option<LocationFix>>,
    tracking_task: Mutex<Option<String>>,
}

impl SimulatedLocation {
    /// All permissions granted, no fix yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent requests for `scope` fail.
    pub fn deny(&self, scope: PermissionScope) {
        self.denied.lock().insert(scope);
    }

    pub fn grant(&self, scope: PermissionScope) {
        self.denied.lock().remove(&scope);
    }

    pub fn set_position(&self, coordinates: Coordinates, timestamp: DateTime<Utc>) -> LocationFix {
        let fix = LocationFix::new(coordinates, timestamp);
        *self.position.write() = Some(fix);
        fix
    }

    pub fn position(&self) -> Option<LocationFix> {
        *self.position.read()
    }

    /// Regions currently registered for enter/exit monitoring.
    pub fn monitored_regions(&self) -> Vec<GeofenceRegion> {
        self.monitored.lock().clone()
    }

    /// Name of the registered background task, if any.
    pub fn tracking_task(&self) -> Option<String> {
        self.tracking_task.lock().clone()
    }

    fn status(&self, scope: PermissionScope) -> PermissionStatus {
        if self.denied.lock().contains(&scope) {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocation {
    async fn request_permission(
        &self,
        scope: PermissionScope,
    ) -> Result<PermissionStatus, ProviderError> {
        Ok(self.status(scope))
    }

    async fn start_monitoring(&self, regions: &[GeofenceRegion]) -> Result<(), ProviderError> {
        info!(regions = regions.len(), "Simulated geofencing started");
        *self.monitored.lock() = regions.to_vec();
        Ok(())
    }

    async fn stop_monitoring(&self) -> Result<(), ProviderError> {
        self.monitored.lock().clear();
        debug!("Simulated geofencing stopped");
        Ok(())
    }
}

#[async_trait]
impl BackgroundLocationProvider for SimulatedLocation {
    async fn request_permission(&self, scope: PermissionScope) -> TrackingResult<PermissionStatus> {
        Ok(self.status(scope))
    }

    async fn foreground_permission(&self) -> TrackingResult<PermissionStatus> {
        Ok(self.status(PermissionScope::Foreground))
    }

    async fn has_started_updates(&self, task_name: &str) -> TrackingResult<bool> {
        Ok(self.tracking_task.lock().as_deref() == Some(task_name))
    }

    async fn start_updates(&self, options: &TrackingOptions) -> TrackingResult<()> {
        *self.tracking_task.lock() = Some(options.task_name.clone());
        Ok(())
    }

    async fn stop_updates(&self, task_name: &str) -> TrackingResult<()> {
        let mut task = self.tracking_task.lock();
        if task.as_deref() == Some(task_name) {
            *task = None;
        }
        Ok(())
    }

    async fn current_position(&self) -> TrackingResult<LocationFix> {
        self.position()
            .ok_or_else(|| TrackingError::Provider("no position fix yet".to_string()))
    }
}
