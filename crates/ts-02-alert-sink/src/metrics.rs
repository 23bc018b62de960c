//! # Alert Sink Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `ts_alert_sink_notifications_total` - alerts stored in the notification list
//! - `ts_alert_sink_ledger_writes_total{outcome}` - ledger writes by outcome
//! - `ts_alert_sink_sos_total{outcome}` - SOS attempts by outcome

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref NOTIFICATIONS: IntCounter = register_int_counter!(
        "ts_alert_sink_notifications_total",
        "Alerts stored in the notification list"
    )
    .expect("Failed to create NOTIFICATIONS metric");

    pub static ref LEDGER_WRITES: IntCounterVec = register_int_counter_vec!(
        "ts_alert_sink_ledger_writes_total",
        "Ledger writes by outcome",
        &["outcome"]
    )
    .expect("Failed to create LEDGER_WRITES metric");

    pub static ref SOS: IntCounterVec = register_int_counter_vec!(
        "ts_alert_sink_sos_total",
        "Emergency SOS attempts by outcome",
        &["outcome"]
    )
    .expect("Failed to create SOS metric");
}

#[cfg(feature = "metrics")]
pub fn record_notification_stored() {
    NOTIFICATIONS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_ledger_write(outcome: &str) {
    LEDGER_WRITES.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_sos(outcome: &str) {
    SOS.with_label_values(&[outcome]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_notification_stored() {}

#[cfg(not(feature = "metrics"))]
pub fn record_ledger_write(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_sos(_outcome: &str) {}
