//! # Alert Feed Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `ts_alert_feed_events_total{event}` - contract events mapped to alerts
//! - `ts_alert_feed_log_polls_total{outcome}` - `eth_getLogs` poll rounds

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref EVENTS_MAPPED: IntCounterVec = register_int_counter_vec!(
        "ts_alert_feed_events_total",
        "Contract events mapped to alerts",
        &["event"]
    )
    .expect("Failed to create EVENTS_MAPPED metric");

    pub static ref LOG_POLLS: IntCounterVec = register_int_counter_vec!(
        "ts_alert_feed_log_polls_total",
        "Contract log poll rounds by outcome",
        &["outcome"]
    )
    .expect("Failed to create LOG_POLLS metric");
}

#[cfg(feature = "metrics")]
pub fn record_event_mapped(event: &str) {
    EVENTS_MAPPED.with_label_values(&[event]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_log_poll(outcome: &str) {
    LOG_POLLS.with_label_values(&[outcome]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_event_mapped(_event: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_log_poll(_outcome: &str) {}
