//! Prometheus exposition.
//!
//! Subsystem crates register their counters with the default registry from
//! their own `metrics` modules (naming convention `ts_<subsystem>_<metric>`);
//! this module only renders whatever has been registered.

use prometheus::{Encoder, TextEncoder};

use crate::TelemetryError;

/// Encode all metrics in the default registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
