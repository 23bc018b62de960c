//! Ports for Location Tracking

use crate::domain::{IngestPayload, IngestResponse, LocationFix, TrackingOptions};
use crate::error::TrackingResult;
use async_trait::async_trait;
use shared_types::{PermissionScope, PermissionStatus};

/// OS background location facility.
#[async_trait]
pub trait BackgroundLocationProvider: Send + Sync {
    /// Prompt for a permission.
    async fn request_permission(&self, scope: PermissionScope) -> TrackingResult<PermissionStatus>;

    /// Current foreground permission, without prompting.
    async fn foreground_permission(&self) -> TrackingResult<PermissionStatus>;

    /// Whether the OS task is already delivering updates.
    async fn has_started_updates(&self, task_name: &str) -> TrackingResult<bool>;

    async fn start_updates(&self, options: &TrackingOptions) -> TrackingResult<()>;

    async fn stop_updates(&self, task_name: &str) -> TrackingResult<()>;

    async fn current_position(&self) -> TrackingResult<LocationFix>;
}

/// Safety-scoring backend.
#[async_trait]
pub trait IngestClient: Send + Sync {
    /// `POST /ingest`
    async fn send_location(&self, payload: &IngestPayload) -> TrackingResult<IngestResponse>;

    /// `GET /alerts?only_alerts=..`
    async fn fetch_alerts(&self, only_alerts: bool) -> TrackingResult<Vec<serde_json::Value>>;
}
