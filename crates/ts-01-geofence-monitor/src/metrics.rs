//! # Geofence Monitor Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `ts_geofence_transitions_total{kind}` - enter / exit state changes
//! - `ts_geofence_duplicate_signals_total{kind}` - debounced signals
//! - `ts_geofence_periodic_alerts_total` - periodic reminders emitted
//! - `ts_geofence_remote_writes_total{outcome}` - remote write outcomes
//! - `ts_geofence_regions_inside` - regions currently inside

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref TRANSITIONS: IntCounterVec = register_int_counter_vec!(
        "ts_geofence_transitions_total",
        "Geofence membership changes",
        &["kind"]
    )
    .expect("Failed to create TRANSITIONS metric");

    pub static ref DUPLICATE_SIGNALS: IntCounterVec = register_int_counter_vec!(
        "ts_geofence_duplicate_signals_total",
        "Geofence signals that did not change membership",
        &["kind"]
    )
    .expect("Failed to create DUPLICATE_SIGNALS metric");

    pub static ref PERIODIC_ALERTS: IntCounter = register_int_counter!(
        "ts_geofence_periodic_alerts_total",
        "Periodic in-region reminders emitted"
    )
    .expect("Failed to create PERIODIC_ALERTS metric");

    pub static ref REMOTE_WRITES: IntCounterVec = register_int_counter_vec!(
        "ts_geofence_remote_writes_total",
        "Remote ledger write outcomes",
        &["outcome"]
    )
    .expect("Failed to create REMOTE_WRITES metric");

    pub static ref REGIONS_INSIDE: IntGauge = register_int_gauge!(
        "ts_geofence_regions_inside",
        "Monitored regions the device is currently inside"
    )
    .expect("Failed to create REGIONS_INSIDE metric");
}

#[cfg(feature = "metrics")]
pub fn record_transition(kind: &str) {
    TRANSITIONS.with_label_values(&[kind]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_duplicate_signal(kind: &str) {
    DUPLICATE_SIGNALS.with_label_values(&[kind]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_periodic_alert() {
    PERIODIC_ALERTS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_remote_write(outcome: &str) {
    REMOTE_WRITES.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn set_regions_inside(count: usize) {
    REGIONS_INSIDE.set(count as i64);
}

#[cfg(not(feature = "metrics"))]
pub fn record_transition(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_duplicate_signal(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_periodic_alert() {}

#[cfg(not(feature = "metrics"))]
pub fn record_remote_write(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_regions_inside(_count: usize) {}
