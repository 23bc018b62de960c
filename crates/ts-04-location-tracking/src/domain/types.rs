//! Tracking value types and backend wire format.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Coordinates, WalletAddress};
use std::time::Duration;

/// Tourist id sent when no wallet identity is available.
pub const UNKNOWN_TOURIST_ID: &str = "unknown-tourist-id";

/// Name of the OS background task that delivers fixes.
pub const LOCATION_TASK_NAME: &str = "background-location-task";

/// A position fix with the time it was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    pub fn new(coordinates: Coordinates, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinates,
            timestamp,
        }
    }
}

/// Options passed to the OS when background updates start.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingOptions {
    pub task_name: String,
    pub time_interval: Duration,
    pub distance_interval_m: f64,
    pub notification_title: String,
    pub notification_body: String,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            task_name: LOCATION_TASK_NAME.to_string(),
            time_interval: Duration::from_secs(10 * 60),
            distance_interval_m: 100.0,
            notification_title: "Tourist Safety Tracking".to_string(),
            notification_body: "Your location is being tracked for safety monitoring".to_string(),
        }
    }
}

/// Body of `POST /ingest`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestPayload {
    pub lat: f64,
    pub lon: f64,
    /// RFC 3339 with milliseconds, UTC.
    pub ts: String,
    pub tourist_id: String,
}

impl IngestPayload {
    pub fn from_fix(fix: &LocationFix, tourist_id: impl Into<String>) -> Self {
        Self {
            lat: fix.coordinates.latitude,
            lon: fix.coordinates.longitude,
            ts: fix.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            tourist_id: tourist_id.into(),
        }
    }
}

/// Tourist id for a wallet identity.
pub fn tourist_id(wallet: Option<WalletAddress>) -> String {
    wallet
        .map(|w| w.to_string())
        .unwrap_or_else(|| UNKNOWN_TOURIST_ID.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Response of `POST /ingest`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub tourist_id: String,
    pub timestamp: String,
    pub current_location: LatLon,
    #[serde(default)]
    pub anomalies_detected: Vec<serde_json::Value>,
    #[serde(default)]
    pub risk_probability: Option<f64>,
    #[serde(default)]
    pub safety_score: Option<f64>,
    #[serde(default)]
    pub next_expected_location: Option<LatLon>,
    #[serde(default)]
    pub next_expected_time: Option<String>,
    #[serde(default)]
    pub alert: bool,
}

/// Display text for a safety score.
pub fn safety_rating_text(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent safety rating"
    } else if score >= 60.0 {
        "Good safety rating"
    } else {
        "Poor safety rating"
    }
}
