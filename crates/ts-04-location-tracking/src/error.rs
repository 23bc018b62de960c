//! Error types for Location Tracking

use shared_types::PermissionScope;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Location permission not granted: {scope}")]
    PermissionDenied { scope: PermissionScope },

    /// The OS location facility failed.
    #[error("Location provider error: {0}")]
    Provider(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed backend response: {0}")]
    Decode(String),
}

impl TrackingError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TrackingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub type TrackingResult<T> = Result<T, TrackingError>;
