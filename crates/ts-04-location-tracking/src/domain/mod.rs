//! Location tracking domain

pub mod types;

pub use types::{
    safety_rating_text, tourist_id, IngestPayload, IngestResponse, LatLon, LocationFix,
    TrackingOptions, LOCATION_TASK_NAME, UNKNOWN_TOURIST_ID,
};
