//! Background location tracking service
//!
//! Starts and stops the OS background task and posts each delivered fix to
//! the safety-scoring backend.

use crate::domain::{tourist_id, IngestPayload, IngestResponse, LocationFix, TrackingOptions};
use crate::error::{TrackingError, TrackingResult};
use crate::metrics;
use crate::ports::{BackgroundLocationProvider, IngestClient};
use shared_types::{IdentityProvider, PermissionScope};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Summary of one batch of fixes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub sent: usize,
    pub failed: usize,
    /// Responses the backend flagged as alerts.
    pub alerts: Vec<IngestResponse>,
}

pub struct TrackingService {
    provider: Arc<dyn BackgroundLocationProvider>,
    client: Arc<dyn IngestClient>,
    identity: Arc<dyn IdentityProvider>,
    options: TrackingOptions,
    tracking: AtomicBool,
}

impl TrackingService {
    pub fn new(
        provider: Arc<dyn BackgroundLocationProvider>,
        client: Arc<dyn IngestClient>,
        identity: Arc<dyn IdentityProvider>,
        options: TrackingOptions,
    ) -> Self {
        Self {
            provider,
            client,
            identity,
            options,
            tracking: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &TrackingOptions {
        &self.options
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }

    async fn require(&self, scope: PermissionScope) -> TrackingResult<()> {
        let status = self.provider.request_permission(scope).await?;
        if !status.is_granted() {
            error!(%scope, "[ts-04] Location permission not granted");
            return Err(TrackingError::PermissionDenied { scope });
        }
        Ok(())
    }

    /// Start background updates. Idempotent.
    pub async fn start_background_tracking(&self) -> TrackingResult<()> {
        if self.is_tracking() {
            info!("[ts-04] Location tracking already started");
            return Ok(());
        }

        self.require(PermissionScope::Foreground).await?;
        self.require(PermissionScope::Background).await?;

        if self
            .provider
            .has_started_updates(&self.options.task_name)
            .await?
        {
            info!(task = %self.options.task_name, "[ts-04] Background location task already registered");
            self.tracking.store(true, Ordering::SeqCst);
            return Ok(());
        }

        self.provider.start_updates(&self.options).await?;
        self.tracking.store(true, Ordering::SeqCst);
        info!(
            interval_secs = self.options.time_interval.as_secs(),
            distance_m = self.options.distance_interval_m,
            "[ts-04] Background location tracking started"
        );
        Ok(())
    }

    /// Stop background updates. Idempotent.
    pub async fn stop_background_tracking(&self) -> TrackingResult<()> {
        if !self.is_tracking() {
            info!("[ts-04] Location tracking not started");
            return Ok(());
        }

        if self
            .provider
            .has_started_updates(&self.options.task_name)
            .await?
        {
            self.provider.stop_updates(&self.options.task_name).await?;
        }
        self.tracking.store(false, Ordering::SeqCst);
        info!("[ts-04] Background location tracking stopped");
        Ok(())
    }

    /// One-off position. Requires an already granted foreground permission;
    /// never prompts.
    pub async fn current_location(&self) -> Option<LocationFix> {
        match self.provider.foreground_permission().await {
            Ok(status) if status.is_granted() => {}
            Ok(_) => {
                error!("[ts-04] Location permission not granted");
                return None;
            }
            Err(e) => {
                error!(error = %e, "[ts-04] Error checking location permission");
                return None;
            }
        }

        match self.provider.current_position().await {
            Ok(fix) => Some(fix),
            Err(e) => {
                error!(error = %e, "[ts-04] Error getting current location");
                None
            }
        }
    }

    pub fn tourist_id(&self) -> String {
        tourist_id(self.identity.wallet_address())
    }

    /// Post a batch of fixes in order. A failed fix is logged and skipped.
    pub async fn process_fixes(&self, fixes: &[LocationFix]) -> BatchReport {
        let tourist_id = self.tourist_id();
        let mut report = BatchReport::default();

        for fix in fixes {
            let payload = IngestPayload::from_fix(fix, tourist_id.as_str());
            match self.client.send_location(&payload).await {
                Ok(response) => {
                    report.sent += 1;
                    metrics::record_ingest("ok");
                    if response.alert {
                        metrics::record_safety_alert();
                        warn!(
                            tourist_id = %response.tourist_id,
                            anomalies = ?response.anomalies_detected,
                            risk_probability = ?response.risk_probability,
                            safety_score = ?response.safety_score,
                            "[ts-04] SAFETY ALERT"
                        );
                        report.alerts.push(response);
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    metrics::record_ingest("failed");
                    error!(error = %e, ts = %payload.ts, "[ts-04] Failed to send location to backend");
                }
            }
        }
        report
    }

    /// Alerts known to the backend. Empty on failure.
    pub async fn fetch_alerts(&self, only_alerts: bool) -> Vec<serde_json::Value> {
        match self.client.fetch_alerts(only_alerts).await {
            Ok(alerts) => alerts,
            Err(e) => {
                error!(error = %e, "[ts-04] Error fetching alerts");
                Vec::new()
            }
        }
    }
}
