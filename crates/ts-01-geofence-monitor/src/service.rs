//! Geofence Monitor Service
//!
//! Owns one [`MonitorState`] per region. Signal handling and periodic ticks
//! both take the same state lock, so a tick queued behind an exit sees the
//! exit and stands down.

use crate::domain::{
    distance_to_boundary_m, haversine_distance_m, AlertTemplates, AlertTrigger, GeofenceSignal, MonitorState,
    PeriodicTask, TimerEpoch, Transition,
};
use crate::error::{MonitorError, MonitorResult};
use crate::metrics;
use crate::ports::inbound::{GeofenceMonitorApi, RegionStatus, SignalOutcome};
use crate::ports::outbound::{AlertSink, LocationProvider, RemoteAlertRequest};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use shared_types::{validate_regions, Coordinates, GeofenceRegion, PermissionScope, RegionId};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Monitor configuration
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Interval of the in-region reminder
    pub alert_interval: Duration,
    pub templates: AlertTemplates,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            alert_interval: Duration::from_secs(60),
            templates: AlertTemplates::default(),
        }
    }
}

/// State shared with timer tasks. Timers hold it weakly.
struct MonitorShared {
    config: MonitorConfig,
    sink: Arc<dyn AlertSink>,
    regions: Mutex<HashMap<RegionId, MonitorState>>,
    last_fix: RwLock<Option<Coordinates>>,
    /// Runtime the monitor was started on. OS callbacks may arrive on any
    /// thread; timers and remote writes are spawned here.
    runtime: RwLock<Option<Handle>>,
}

impl MonitorShared {
    fn last_fix(&self) -> Option<Coordinates> {
        *self.last_fix.read()
    }

    fn runtime(&self) -> Option<Handle> {
        self.runtime.read().clone()
    }

    /// Deliver the local alert and schedule the remote write.
    fn emit(&self, runtime: &Handle, trigger: AlertTrigger, region_id: &RegionId) {
        let templates = &self.config.templates;
        let last_fix = self.last_fix();

        self.sink
            .notify(templates.local_alert(trigger, region_id, last_fix));

        let request = RemoteAlertRequest {
            message: templates.remote_message(trigger).to_string(),
            region_id: region_id.clone(),
            position: last_fix,
        };
        let sink = Arc::clone(&self.sink);
        runtime.spawn(async move {
            let region_id = request.region_id.clone();
            let outcome = sink.record_remote(request).await;
            metrics::record_remote_write(outcome.label());
            debug!(region_id = %region_id, outcome = ?outcome, "[ts-01] Remote write finished");
        });
    }

    fn start_timer(
        this: &Arc<Self>,
        runtime: &Handle,
        region_id: RegionId,
        epoch: TimerEpoch,
    ) -> PeriodicTask {
        let weak: Weak<Self> = Arc::downgrade(this);
        PeriodicTask::spawn(runtime, this.config.alert_interval, move || {
            match weak.upgrade() {
                Some(shared) => shared.on_tick(&region_id, epoch),
                None => ControlFlow::Break(()),
            }
        })
    }

    fn on_tick(&self, region_id: &RegionId, epoch: TimerEpoch) -> ControlFlow<()> {
        let regions = self.regions.lock();
        let Some(state) = regions.get(region_id) else {
            return ControlFlow::Break(());
        };
        if !state.accepts_tick(epoch) {
            debug!(region_id = %region_id, epoch, "[ts-01] Stale tick dropped");
            return ControlFlow::Break(());
        }

        let Some(runtime) = self.runtime() else {
            return ControlFlow::Break(());
        };
        debug!(region_id = %region_id, "[ts-01] Periodic in-region alert");
        metrics::record_periodic_alert();
        self.emit(&runtime, AlertTrigger::Periodic, region_id);
        ControlFlow::Continue(())
    }

    fn inside_count(regions: &HashMap<RegionId, MonitorState>) -> usize {
        regions.values().filter(|s| s.is_inside()).count()
    }
}

/// Geofence Monitor
///
/// Construct with injected provider and sink, then [`start`](Self::start).
/// Dropping the monitor cancels every periodic timer but does not deregister
/// regions with the provider; call [`stop`](Self::stop) for that.
pub struct GeofenceMonitor {
    shared: Arc<MonitorShared>,
    provider: Arc<dyn LocationProvider>,
    active: AtomicBool,
}

impl GeofenceMonitor {
    pub fn new(
        config: MonitorConfig,
        provider: Arc<dyn LocationProvider>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            shared: Arc::new(MonitorShared {
                config,
                sink,
                regions: Mutex::new(HashMap::new()),
                last_fix: RwLock::new(None),
                runtime: RwLock::new(Handle::try_current().ok()),
            }),
            provider,
            active: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.shared.config
    }

    /// Membership of a region, `None` if it is not monitored.
    pub fn is_inside(&self, region_id: &RegionId) -> Option<bool> {
        self.shared.regions.lock().get(region_id).map(|s| s.is_inside())
    }

    /// Whether a periodic reminder is live for a region.
    pub fn has_periodic_alert(&self, region_id: &RegionId) -> Option<bool> {
        self.shared
            .regions
            .lock()
            .get(region_id)
            .map(|s| s.has_periodic_alert())
    }

    pub fn last_fix(&self) -> Option<Coordinates> {
        self.shared.last_fix()
    }

    async fn require_permission(&self, scope: PermissionScope) -> MonitorResult<()> {
        let status = self
            .provider
            .request_permission(scope)
            .await
            .map_err(|e| MonitorError::PermissionRequest {
                scope,
                reason: e.reason,
            })?;
        if !status.is_granted() {
            warn!(%scope, "[ts-01] Location permission denied");
            return Err(MonitorError::PermissionDenied { scope });
        }
        Ok(())
    }

    fn reset_local_state(&self) -> usize {
        let drained: Vec<MonitorState> = {
            let mut regions = self.shared.regions.lock();
            regions.drain().map(|(_, state)| state).collect()
        };
        metrics::set_regions_inside(0);
        // Dropping the states aborts their timers.
        let count = drained.len();
        drop(drained);
        count
    }
}

#[async_trait]
impl GeofenceMonitorApi for GeofenceMonitor {
    async fn start(&self, regions: Vec<GeofenceRegion>) -> MonitorResult<()> {
        validate_regions(&regions)?;
        let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;

        if self.active.load(Ordering::SeqCst) {
            info!("[ts-01] Monitor already active, restarting");
            self.stop().await;
        }

        self.require_permission(PermissionScope::Foreground).await?;
        self.require_permission(PermissionScope::Background).await?;

        self.provider
            .start_monitoring(&regions)
            .await
            .map_err(|e| {
                warn!(reason = %e.reason, "[ts-01] Provider failed to start geofencing");
                MonitorError::ProviderStart { reason: e.reason }
            })?;

        *self.shared.runtime.write() = Some(runtime);
        {
            let mut states = self.shared.regions.lock();
            for region in regions {
                info!(
                    region_id = %region.id,
                    center = %region.center,
                    radius_m = region.radius_m,
                    "[ts-01] Monitoring region"
                );
                states.insert(region.id.clone(), MonitorState::new(region));
            }
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::SeqCst);
        let cleared = self.reset_local_state();

        match self.provider.stop_monitoring().await {
            Ok(()) => {
                info!(regions = cleared, was_active, "[ts-01] Geofence monitoring stopped");
                true
            }
            Err(e) => {
                warn!(reason = %e.reason, "[ts-01] Provider failed to stop geofencing; local state reset anyway");
                false
            }
        }
    }

    fn on_raw_signal(&self, region_id: &RegionId, signal: GeofenceSignal) -> SignalOutcome {
        let mut regions = self.shared.regions.lock();
        let Some(state) = regions.get_mut(region_id) else {
            debug!(region_id = %region_id, %signal, "[ts-01] Signal for unmonitored region ignored");
            return SignalOutcome::UnknownRegion;
        };
        // Regions are only registered by `start`, which records the runtime.
        let Some(runtime) = self.shared.runtime() else {
            warn!(region_id = %region_id, %signal, "[ts-01] No runtime for signal, ignored");
            return SignalOutcome::UnknownRegion;
        };

        let shared = &self.shared;
        let timer_region = region_id.clone();
        let transition = state.apply(signal, Utc::now(), |epoch| {
            MonitorShared::start_timer(shared, &runtime, timer_region, epoch)
        });

        match transition {
            Transition::Entered => {
                info!(region_id = %region_id, "[ts-01] Entered region");
                metrics::record_transition("enter");
                shared.emit(&runtime, AlertTrigger::Enter, region_id);
            }
            Transition::Exited => {
                info!(region_id = %region_id, "[ts-01] Exited region");
                metrics::record_transition("exit");
                shared.emit(&runtime, AlertTrigger::Exit, region_id);
            }
            Transition::DuplicateEnter | Transition::DuplicateExit => {
                debug!(region_id = %region_id, %signal, "[ts-01] Duplicate signal debounced");
                metrics::record_duplicate_signal(signal.to_string().as_str());
            }
        }
        metrics::set_regions_inside(MonitorShared::inside_count(&regions));

        SignalOutcome::Applied(transition)
    }

    fn on_position_fix(&self, fix: Coordinates) {
        *self.shared.last_fix.write() = Some(fix);

        let regions = self.shared.regions.lock();
        for state in regions.values() {
            let region = state.region();
            let distance = haversine_distance_m(region.center, fix);
            debug!(
                region_id = %region.id,
                position = %fix,
                distance_m = distance,
                radius_m = region.radius_m,
                "[ts-01] Position fix"
            );
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn region_status(&self) -> Vec<RegionStatus> {
        let fix = self.shared.last_fix();
        let regions = self.shared.regions.lock();
        let mut status: Vec<RegionStatus> = regions
            .values()
            .map(|state| RegionStatus {
                region_id: state.region().id.clone(),
                inside: state.is_inside(),
                periodic_alert_active: state.has_periodic_alert(),
                last_transition_at: state.last_transition_at(),
                distance_m: fix.map(|f| haversine_distance_m(state.region().center, f)),
                boundary_distance_m: fix.map(|f| distance_to_boundary_m(state.region(), f)),
            })
            .collect();
        status.sort_by(|a, b| a.region_id.cmp(&b.region_id));
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::ports::outbound::RemoteWriteOutcome;
    use shared_types::{AlertEvent, PermissionStatus};

    #[derive(Default)]
    struct NullProvider {
        deny_background: bool,
    }

    #[async_trait]
    impl LocationProvider for NullProvider {
        async fn request_permission(
            &self,
            scope: PermissionScope,
        ) -> Result<PermissionStatus, ProviderError> {
            if self.deny_background && scope == PermissionScope::Background {
                Ok(PermissionStatus::Denied)
            } else {
                Ok(PermissionStatus::Granted)
            }
        }

        async fn start_monitoring(&self, _: &[GeofenceRegion]) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn stop_monitoring(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        alerts: Mutex<Vec<AlertEvent>>,
    }

    #[async_trait]
    impl AlertSink for CountingSink {
        fn notify(&self, alert: AlertEvent) {
            self.alerts.lock().push(alert);
        }

        async fn record_remote(&self, _: RemoteAlertRequest) -> RemoteWriteOutcome {
            RemoteWriteOutcome::Skipped {
                reason: "test".into(),
            }
        }
    }

    fn region(id: &str) -> GeofenceRegion {
        GeofenceRegion::new(id, Coordinates::new(23.1535719, 72.8864717), 1000.0)
    }

    #[tokio::test]
    async fn test_background_denied_creates_no_state() {
        let sink = Arc::new(CountingSink::default());
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider {
                deny_background: true,
            }),
            sink,
        );

        let err = monitor.start(vec![region("r1")]).await.unwrap_err();
        assert!(matches!(
            err,
            MonitorError::PermissionDenied {
                scope: PermissionScope::Background
            }
        ));
        assert!(!monitor.is_active());
        assert!(monitor.region_status().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_region_rejected() {
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            Arc::new(CountingSink::default()),
        );
        let bad = GeofenceRegion::new("r1", Coordinates::new(0.0, 0.0), 0.0);
        assert!(matches!(
            monitor.start(vec![bad]).await,
            Err(MonitorError::InvalidRegion(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_region_ignored() {
        let sink = Arc::new(CountingSink::default());
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            sink.clone(),
        );
        monitor.start(vec![region("r1")]).await.unwrap();

        let outcome = monitor.on_raw_signal(&RegionId::new("elsewhere"), GeofenceSignal::Enter);
        assert_eq!(outcome, SignalOutcome::UnknownRegion);
        assert!(sink.alerts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_regions_are_independent() {
        let sink = Arc::new(CountingSink::default());
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            sink.clone(),
        );
        monitor
            .start(vec![region("r1"), region("r2")])
            .await
            .unwrap();

        monitor.on_raw_signal(&RegionId::new("r1"), GeofenceSignal::Enter);
        monitor.on_raw_signal(&RegionId::new("r2"), GeofenceSignal::Exit);

        assert_eq!(monitor.is_inside(&RegionId::new("r1")), Some(true));
        assert_eq!(monitor.is_inside(&RegionId::new("r2")), Some(false));
        assert_eq!(sink.alerts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_resets_state() {
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            Arc::new(CountingSink::default()),
        );
        monitor.start(vec![region("r1")]).await.unwrap();
        monitor.on_raw_signal(&RegionId::new("r1"), GeofenceSignal::Enter);

        assert!(monitor.stop().await);
        assert!(!monitor.is_active());
        assert_eq!(monitor.is_inside(&RegionId::new("r1")), None);
    }

    #[tokio::test]
    async fn test_position_fix_recorded_in_status() {
        let monitor = GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            Arc::new(CountingSink::default()),
        );
        monitor.start(vec![region("r1")]).await.unwrap();
        monitor.on_position_fix(Coordinates::new(23.1535719, 72.8864717));

        let status = monitor.region_status();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].distance_m, Some(0.0));
        assert_eq!(status[0].boundary_distance_m, Some(-1000.0));
        assert_eq!(monitor.is_inside(&RegionId::new("r1")), Some(false));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_signal_from_foreign_thread() {
        let sink = Arc::new(CountingSink::default());
        let monitor = Arc::new(GeofenceMonitor::new(
            MonitorConfig::default(),
            Arc::new(NullProvider::default()),
            sink.clone(),
        ));
        monitor.start(vec![region("r1")]).await.unwrap();

        let callback = Arc::clone(&monitor);
        let outcome = std::thread::spawn(move || {
            callback.on_raw_signal(&RegionId::new("r1"), GeofenceSignal::Enter)
        })
        .join()
        .expect("signal delivery must not panic");

        assert_eq!(outcome, SignalOutcome::Applied(Transition::Entered));
        assert_eq!(monitor.is_inside(&RegionId::new("r1")), Some(true));
        assert_eq!(monitor.has_periodic_alert(&RegionId::new("r1")), Some(true));
        assert_eq!(sink.alerts.lock().len(), 1);

        assert!(monitor.stop().await);
    }
}
