//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Position**: `Coordinates`, `GeofenceRegion`, `RegionId`
//! - **Alerts**: `AlertEvent`, `AlertCategory`, `AlertMetadata`
//! - **Identity & Permissions**: `WalletAddress`, `PermissionScope`, `PermissionStatus`

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Meters per degree of latitude used for outline approximation.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Segments used by `GeofenceRegion::outline` when drawing a region on a map.
pub const DEFAULT_OUTLINE_SEGMENTS: usize = 32;

// =============================================================================
// CLUSTER A: POSITION
// =============================================================================

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Identifier of a monitored region, as registered with the location provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RegionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A circular geofence. Immutable for the duration of a monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRegion {
    pub id: RegionId,
    pub center: Coordinates,
    /// Radius in meters, strictly positive.
    pub radius_m: f64,
}

impl GeofenceRegion {
    #[must_use]
    pub fn new(id: impl Into<RegionId>, center: Coordinates, radius_m: f64) -> Self {
        Self {
            id: id.into(),
            center,
            radius_m,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().is_empty() {
            return Err(ValidationError::EmptyRegionId);
        }
        self.center.validate()?;
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(ValidationError::NonPositiveRadius {
                region_id: self.id.to_string(),
                radius_m: self.radius_m,
            });
        }
        Ok(())
    }

    /// Closed polygon approximating the region boundary.
    ///
    /// Returns `segments + 1` points; the last point repeats the first.
    /// Uses a flat-earth approximation, good enough for drawing.
    #[must_use]
    pub fn outline(&self, segments: usize) -> Vec<Coordinates> {
        let segments = segments.max(3);
        let lat_step = self.radius_m / METERS_PER_DEGREE_LAT;
        let lon_step =
            self.radius_m / (METERS_PER_DEGREE_LAT * self.center.latitude.to_radians().cos());

        (0..=segments)
            .map(|i| {
                let angle = (i as f64 / segments as f64) * std::f64::consts::TAU;
                Coordinates::new(
                    self.center.latitude + lat_step * angle.cos(),
                    self.center.longitude + lon_step * angle.sin(),
                )
            })
            .collect()
    }
}

/// Validate a region set: every region valid, identifiers unique.
pub fn validate_regions(regions: &[GeofenceRegion]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(regions.len());
    for region in regions {
        region.validate()?;
        if !seen.insert(region.id.as_str()) {
            return Err(ValidationError::DuplicateRegionId(region.id.to_string()));
        }
    }
    Ok(())
}

// =============================================================================
// CLUSTER B: ALERTS
// =============================================================================

/// Source category of an alert, used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    /// Zone alert broadcast by the ledger contract.
    Zone,
    /// Local geofence transition or periodic reminder.
    Geofence,
    /// Alert raised by (or about) a specific user on the ledger.
    User,
}

impl AlertCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::Geofence => "geofence",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form alert metadata (coordinates, radius, region id, ...).
pub type AlertMetadata = BTreeMap<String, serde_json::Value>;

/// An alert, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub title: String,
    pub message: String,
    pub category: AlertCategory,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AlertMetadata>,
}

impl AlertEvent {
    /// Create an alert stamped with the current time.
    #[must_use]
    pub fn new(
        category: AlertCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            category,
            timestamp: chrono::Utc::now().timestamp(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: AlertMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Add a single metadata entry, creating the map if needed.
    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(AlertMetadata::new)
            .insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }
}

// =============================================================================
// CLUSTER C: IDENTITY & PERMISSIONS
// =============================================================================

/// A 20-byte Ethereum-style wallet address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress([u8; 20]);

impl WalletAddress {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for WalletAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidAddress {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(invalid("expected 40 hex digits"));
        }
        let bytes = hex::decode(digits).map_err(|e| invalid(&e.to_string()))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({self})")
    }
}

/// Location permission scope requested from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Foreground,
    Background,
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground => f.write_str("foreground"),
            Self::Background => f.write_str("background"),
        }
    }
}

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> GeofenceRegion {
        GeofenceRegion::new("square-geofence", Coordinates::new(23.1535719, 72.8864717), 1000.0)
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(23.15, 72.88).validate().is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0).validate(),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.5).validate(),
            Err(ValidationError::LongitudeOutOfRange(-180.5))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_region_rejects_zero_radius() {
        let mut r = region();
        r.radius_m = 0.0;
        assert!(matches!(
            r.validate(),
            Err(ValidationError::NonPositiveRadius { .. })
        ));
    }

    #[test]
    fn test_region_rejects_empty_id() {
        let r = GeofenceRegion::new("", Coordinates::new(0.0, 0.0), 10.0);
        assert_eq!(r.validate(), Err(ValidationError::EmptyRegionId));
    }

    #[test]
    fn test_duplicate_region_ids_rejected() {
        let regions = vec![region(), region()];
        assert_eq!(
            validate_regions(&regions),
            Err(ValidationError::DuplicateRegionId("square-geofence".into()))
        );
    }

    #[test]
    fn test_outline_is_closed() {
        let points = region().outline(DEFAULT_OUTLINE_SEGMENTS);
        assert_eq!(points.len(), DEFAULT_OUTLINE_SEGMENTS + 1);
        let first = points[0];
        let last = points[DEFAULT_OUTLINE_SEGMENTS];
        assert!((first.latitude - last.latitude).abs() < 1e-9);
        assert!((first.longitude - last.longitude).abs() < 1e-9);
        // First point sits due north of the center.
        assert!(first.latitude > region().center.latitude);
    }

    #[test]
    fn test_alert_metadata_builder() {
        let alert = AlertEvent::new(AlertCategory::Geofence, "Restricted Area", "msg")
            .with_meta("region_id", "r1")
            .with_meta("latitude", 23.15);
        assert_eq!(alert.meta("region_id"), Some(&serde_json::json!("r1")));
        assert_eq!(alert.metadata.as_ref().map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_alert_category_serde() {
        let json = serde_json::to_string(&AlertCategory::Geofence).unwrap();
        assert_eq!(json, "\"geofence\"");
    }

    #[test]
    fn test_wallet_address_parse_and_display() {
        let text = "0xa18fc87e627d90c470cb6c155f5da0964a1370f6";
        let address: WalletAddress = text.parse().unwrap();
        assert_eq!(address.to_string(), text);

        let upper: WalletAddress = "0xA18fc87e627D90C470cb6C155f5da0964A1370F6".parse().unwrap();
        assert_eq!(upper, address);
    }

    #[test]
    fn test_wallet_address_rejects_bad_input() {
        assert!("0x1234".parse::<WalletAddress>().is_err());
        assert!("0xzz8fc87e627d90c470cb6c155f5da0964a1370f6"
            .parse::<WalletAddress>()
            .is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outline_is_closed_and_bounded(
                lat in -60.0f64..60.0,
                lon in -179.0f64..179.0,
                radius in 1.0f64..50_000.0,
                segments in 3usize..64,
            ) {
                let region = GeofenceRegion::new("r", Coordinates::new(lat, lon), radius);
                let outline = region.outline(segments);
                prop_assert_eq!(outline.len(), segments + 1);

                let (first, last) = (outline[0], outline[segments]);
                prop_assert!((first.latitude - last.latitude).abs() < 1e-9);
                prop_assert!((first.longitude - last.longitude).abs() < 1e-9);

                let max_dlat = radius / METERS_PER_DEGREE_LAT + 1e-9;
                for point in &outline {
                    prop_assert!((point.latitude - lat).abs() <= max_dlat);
                }
            }

            #[test]
            fn in_range_coordinates_validate(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
                prop_assert!(Coordinates::new(lat, lon).validate().is_ok());
            }
        }
    }
}
