//! # ts-04-location-tracking
//!
//! Background location tracking for the safety-scoring backend.
//!
//! The OS delivers fixes to a registered background task (every 10 minutes
//! or 100 m by default). Each fix is posted to `POST /ingest` tagged with the
//! tourist id, which is the wallet address when one is available. The backend
//! answers with anomalies, a risk probability and a safety score; responses
//! flagged as alerts are logged at warn level.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{BackendConfig, HttpIngestClient};
pub use domain::{
    safety_rating_text, IngestPayload, IngestResponse, LatLon, LocationFix, TrackingOptions,
    UNKNOWN_TOURIST_ID,
};
pub use error::{TrackingError, TrackingResult};
pub use ports::{BackgroundLocationProvider, IngestClient};
pub use service::{BatchReport, TrackingService};
