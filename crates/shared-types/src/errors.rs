//! # Error Types
//!
//! Validation errors for values entering the system.

use thiserror::Error;

/// Errors raised when a domain value fails validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    /// Region radius must be strictly positive.
    #[error("Region {region_id}: radius must be > 0 meters, got {radius_m}")]
    NonPositiveRadius { region_id: String, radius_m: f64 },

    /// Region identifier was empty.
    #[error("Region identifier must not be empty")]
    EmptyRegionId,

    /// The same region identifier was configured twice.
    #[error("Duplicate region identifier: {0}")]
    DuplicateRegionId(String),

    /// Wallet address did not parse as 20 hex-encoded bytes.
    #[error("Invalid wallet address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
}
