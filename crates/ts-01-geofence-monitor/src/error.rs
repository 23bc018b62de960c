//! Error types for the Geofence Monitor

use shared_types::{PermissionScope, ValidationError};
use thiserror::Error;

/// Geofence monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The user refused a required location permission
    #[error("Location permission denied: {scope}")]
    PermissionDenied { scope: PermissionScope },

    /// A region failed validation
    #[error("Invalid region: {0}")]
    InvalidRegion(#[from] ValidationError),

    /// The provider refused to register the regions
    #[error("Failed to start geofencing: {reason}")]
    ProviderStart { reason: String },

    /// The provider failed while asking for a permission
    #[error("Permission request failed for {scope}: {reason}")]
    PermissionRequest { scope: PermissionScope, reason: String },

    /// `start` was polled outside a tokio runtime
    #[error("Geofence monitoring must be started from within a tokio runtime")]
    NoRuntime,
}

/// Failure reported by a location provider adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ProviderError {
    pub reason: String,
}

impl ProviderError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
