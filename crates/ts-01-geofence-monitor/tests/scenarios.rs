//! Monitor behaviour against recording test doubles, on a paused clock.

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use shared_types::{
    AlertCategory, AlertEvent, Coordinates, GeofenceRegion, PermissionScope, PermissionStatus,
    RegionId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ts_01_geofence_monitor::{
    haversine_distance_m, AlertSink, GeofenceMonitor, GeofenceMonitorApi, GeofenceSignal,
    LocationProvider, MonitorConfig, MonitorError, ProviderError, RemoteAlertRequest,
    RemoteWriteOutcome, EARTH_RADIUS_M,
};

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Default)]
struct ScriptedProvider {
    deny_foreground: bool,
    fail_start: bool,
    fail_stop: bool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

#[async_trait]
impl LocationProvider for ScriptedProvider {
    async fn request_permission(
        &self,
        scope: PermissionScope,
    ) -> Result<PermissionStatus, ProviderError> {
        if self.deny_foreground && scope == PermissionScope::Foreground {
            return Ok(PermissionStatus::Denied);
        }
        Ok(PermissionStatus::Granted)
    }

    async fn start_monitoring(&self, _regions: &[GeofenceRegion]) -> Result<(), ProviderError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(ProviderError::new("geofencing unavailable"));
        }
        Ok(())
    }

    async fn stop_monitoring(&self) -> Result<(), ProviderError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(ProviderError::new("task not registered"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    alerts: Mutex<Vec<AlertEvent>>,
    remote: Mutex<Vec<RemoteAlertRequest>>,
    fail_remote: bool,
}

impl RecordingSink {
    fn failing() -> Self {
        Self {
            fail_remote: true,
            ..Self::default()
        }
    }

    fn titles(&self) -> Vec<String> {
        self.alerts.lock().iter().map(|a| a.title.clone()).collect()
    }

    fn alert_count(&self) -> usize {
        self.alerts.lock().len()
    }

    fn remote_count(&self) -> usize {
        self.remote.lock().len()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    fn notify(&self, alert: AlertEvent) {
        self.alerts.lock().push(alert);
    }

    async fn record_remote(&self, request: RemoteAlertRequest) -> RemoteWriteOutcome {
        self.remote.lock().push(request);
        if self.fail_remote {
            RemoteWriteOutcome::Failed {
                reason: "insufficient funds".into(),
            }
        } else {
            RemoteWriteOutcome::Recorded {
                tx_hash: "0xabc".into(),
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

const INTERVAL: Duration = Duration::from_secs(60);

fn r1() -> RegionId {
    RegionId::new("r1")
}

fn region(id: &str) -> GeofenceRegion {
    GeofenceRegion::new(id, Coordinates::new(23.1535719, 72.8864717), 1000.0)
}

async fn started(
    provider: Arc<ScriptedProvider>,
    sink: Arc<RecordingSink>,
) -> GeofenceMonitor {
    let monitor = GeofenceMonitor::new(MonitorConfig::default(), provider, sink);
    monitor.start(vec![region("r1")]).await.unwrap();
    monitor
}

/// Let spawned tasks (timer loops, remote writes) run.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn advance(by: Duration) {
    tokio::time::advance(by).await;
    settle().await;
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_enter_emits_one_alert_and_starts_timer() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    assert_eq!(monitor.is_inside(&r1()), Some(true));
    assert_eq!(monitor.has_periodic_alert(&r1()), Some(true));
    assert_eq!(sink.titles(), vec!["Restricted Area"]);
    assert_eq!(sink.alerts.lock()[0].category, AlertCategory::Geofence);
    assert_eq!(sink.remote_count(), 1);
    assert_eq!(
        sink.remote.lock()[0].message,
        "User entered restricted geofence area"
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_enter_is_debounced() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    assert_eq!(sink.alert_count(), 1);
    assert_eq!(monitor.has_periodic_alert(&r1()), Some(true));

    // One timer only: a single tick per interval.
    advance(INTERVAL).await;
    assert_eq!(sink.alert_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_tick_fires_after_interval_while_inside() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    advance(INTERVAL - Duration::from_secs(1)).await;
    assert_eq!(sink.alert_count(), 1, "first tick is one full interval after enter");

    advance(Duration::from_secs(1)).await;
    assert_eq!(sink.alert_count(), 2);
    assert_eq!(sink.titles()[1], "Restricted Area");
    assert_eq!(
        sink.alerts.lock()[1].meta("trigger"),
        Some(&serde_json::json!("periodic"))
    );
    assert_eq!(monitor.is_inside(&r1()), Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_exit_cancels_timer_and_stops_ticks() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    monitor.on_raw_signal(&r1(), GeofenceSignal::Exit);
    settle().await;

    assert_eq!(monitor.is_inside(&r1()), Some(false));
    assert_eq!(monitor.has_periodic_alert(&r1()), Some(false));
    assert_eq!(sink.titles(), vec!["Restricted Area", "Exit Restricted Area"]);

    advance(INTERVAL).await;
    advance(INTERVAL).await;
    assert_eq!(sink.alert_count(), 2);
    assert_eq!(sink.remote.lock()[1].message, "User exited restricted geofence area");
}

#[tokio::test(start_paused = true)]
async fn test_repeated_exit_while_outside_is_debounced() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Exit);
    monitor.on_raw_signal(&r1(), GeofenceSignal::Exit);
    settle().await;

    assert_eq!(sink.alert_count(), 0);
    assert_eq!(sink.remote_count(), 0);
    assert_eq!(monitor.has_periodic_alert(&r1()), Some(false));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_continue_when_remote_writes_fail() {
    let sink = Arc::new(RecordingSink::failing());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    for _ in 0..3 {
        advance(INTERVAL).await;
    }

    assert_eq!(sink.alert_count(), 4);
    assert_eq!(sink.remote_count(), 4);
    assert_eq!(monitor.is_inside(&r1()), Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_reentry_runs_a_single_fresh_timer() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    advance(Duration::from_secs(30)).await;
    monitor.on_raw_signal(&r1(), GeofenceSignal::Exit);
    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;
    assert_eq!(sink.alert_count(), 3);

    // The first timer would have fired here.
    advance(Duration::from_secs(30)).await;
    assert_eq!(sink.alert_count(), 3);

    advance(Duration::from_secs(30)).await;
    assert_eq!(sink.alert_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_remote_write_uses_last_fix() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;
    assert_eq!(sink.remote.lock()[0].position, None);

    let fix = Coordinates::new(23.15, 72.88);
    monitor.on_position_fix(fix);
    advance(INTERVAL).await;

    assert_eq!(sink.remote.lock()[1].position, Some(fix));
    assert_eq!(sink.alerts.lock()[1].meta("latitude"), Some(&serde_json::json!(23.15)));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_foreground_denied_prevents_start() {
    let provider = Arc::new(ScriptedProvider {
        deny_foreground: true,
        ..ScriptedProvider::default()
    });
    let monitor = GeofenceMonitor::new(
        MonitorConfig::default(),
        provider.clone(),
        Arc::new(RecordingSink::default()),
    );

    let result = monitor.start(vec![region("r1")]).await;
    assert!(matches!(result, Err(MonitorError::PermissionDenied { .. })));
    assert_eq!(provider.start_calls.load(Ordering::SeqCst), 0);
    assert!(!monitor.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_provider_start_failure_leaves_monitor_inactive() {
    let provider = Arc::new(ScriptedProvider {
        fail_start: true,
        ..ScriptedProvider::default()
    });
    let monitor = GeofenceMonitor::new(
        MonitorConfig::default(),
        provider,
        Arc::new(RecordingSink::default()),
    );

    let result = monitor.start(vec![region("r1")]).await;
    assert!(matches!(result, Err(MonitorError::ProviderStart { .. })));
    assert!(!monitor.is_active());
    assert_eq!(monitor.is_inside(&r1()), None);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_fail_open() {
    let provider = Arc::new(ScriptedProvider {
        fail_stop: true,
        ..ScriptedProvider::default()
    });
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(provider.clone(), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    assert!(!monitor.stop().await);
    assert!(!monitor.is_active());
    assert_eq!(provider.stop_calls.load(Ordering::SeqCst), 1);

    advance(INTERVAL).await;
    assert_eq!(sink.alert_count(), 1, "timer cancelled despite provider failure");
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_timers() {
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;
    drop(monitor);

    advance(INTERVAL).await;
    advance(INTERVAL).await;
    assert_eq!(sink.alert_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_previous_session() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(RecordingSink::default());
    let monitor = started(provider.clone(), sink.clone()).await;

    monitor.on_raw_signal(&r1(), GeofenceSignal::Enter);
    settle().await;

    monitor.start(vec![region("r1")]).await.unwrap();
    assert_eq!(provider.stop_calls.load(Ordering::SeqCst), 1);
    assert_eq!(monitor.is_inside(&r1()), Some(false));

    advance(INTERVAL).await;
    assert_eq!(sink.alert_count(), 1);
}

// =============================================================================
// Distance
// =============================================================================

#[test]
fn test_distance_to_self_is_zero() {
    let p = Coordinates::new(23.1535719, 72.8864717);
    assert_eq!(haversine_distance_m(p, p), 0.0);
}

#[test]
fn test_distance_between_points_100m_apart() {
    let a = Coordinates::new(23.1535719, 72.8864717);

    let north = Coordinates::new(a.latitude + (100.0 / EARTH_RADIUS_M).to_degrees(), a.longitude);
    let d = haversine_distance_m(a, north);
    assert!((d - 100.0).abs() <= 1.0, "north: {d}");

    let dlon = (100.0 / (EARTH_RADIUS_M * a.latitude.to_radians().cos())).to_degrees();
    let east = Coordinates::new(a.latitude, a.longitude + dlon);
    let d = haversine_distance_m(a, east);
    assert!((d - 100.0).abs() <= 1.0, "east: {d}");
}

// =============================================================================
// Properties
// =============================================================================

fn signal_strategy() -> impl Strategy<Value = GeofenceSignal> {
    prop_oneof![Just(GeofenceSignal::Enter), Just(GeofenceSignal::Exit)]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    /// One alert per real transition, and a timer exactly while inside.
    #[test]
    fn test_alerts_match_transitions_and_timer_tracks_membership(
        signals in proptest::collection::vec(signal_strategy(), 0..40)
    ) {
        runtime().block_on(async {
            let sink = Arc::new(RecordingSink::default());
            let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

            let mut inside = false;
            let mut transitions = 0usize;
            for signal in signals {
                monitor.on_raw_signal(&r1(), signal);
                let now_inside = signal == GeofenceSignal::Enter;
                if now_inside != inside {
                    transitions += 1;
                    inside = now_inside;
                }
                prop_assert_eq!(monitor.is_inside(&r1()), Some(inside));
                prop_assert_eq!(monitor.has_periodic_alert(&r1()), Some(inside));
            }
            settle().await;
            prop_assert_eq!(sink.alert_count(), transitions);
            Ok(())
        })?;
    }

    /// Any run of identical signals after the first changes nothing.
    #[test]
    fn test_repeated_signals_are_idempotent(signal in signal_strategy(), repeats in 1usize..10) {
        runtime().block_on(async {
            let sink = Arc::new(RecordingSink::default());
            let monitor = started(Arc::new(ScriptedProvider::default()), sink.clone()).await;

            for _ in 0..repeats {
                monitor.on_raw_signal(&r1(), signal);
            }
            settle().await;

            let expected = usize::from(signal == GeofenceSignal::Enter);
            prop_assert_eq!(sink.alert_count(), expected);
            prop_assert_eq!(monitor.is_inside(&r1()), Some(signal == GeofenceSignal::Enter));
            Ok(())
        })?;
    }
}
