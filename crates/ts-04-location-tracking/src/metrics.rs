//! # Location Tracking Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `ts_tracking_ingest_requests_total{outcome}` - fixes posted to the backend
//! - `ts_tracking_safety_alerts_total` - backend responses flagged as alerts

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref INGEST_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "ts_tracking_ingest_requests_total",
        "Location fixes posted to the backend",
        &["outcome"]
    )
    .expect("Failed to create INGEST_REQUESTS metric");

    pub static ref SAFETY_ALERTS: IntCounter = register_int_counter!(
        "ts_tracking_safety_alerts_total",
        "Backend responses flagged as safety alerts"
    )
    .expect("Failed to create SAFETY_ALERTS metric");
}

#[cfg(feature = "metrics")]
pub fn record_ingest(outcome: &str) {
    INGEST_REQUESTS.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_safety_alert() {
    SAFETY_ALERTS.inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_ingest(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_safety_alert() {}
