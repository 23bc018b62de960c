//! Contract event shapes and their mapping to alerts.
//!
//! Coordinates arrive as the integers the contract stores and are passed
//! through unchanged.

use serde::{Deserialize, Serialize};
use shared_types::{AlertCategory, AlertEvent, WalletAddress};

/// `ZoneAlert(alertMessage, alertType, latitude, longitude, radius, timestamp)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAlertLog {
    pub alert_message: String,
    #[serde(default)]
    pub alert_type: String,
    pub latitude: i64,
    pub longitude: i64,
    pub radius: u64,
    pub timestamp: i64,
}

/// `AlertEvent(userAddress, name, homeAddress, phoneNumber, aadhar, passport,
/// alertMessage, latitude, longitude, timestamp)`
///
/// The identity documents are part of the event but never leave this type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAlertLog {
    pub user_address: WalletAddress,
    pub name: String,
    #[serde(default)]
    pub home_address: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub aadhar: String,
    #[serde(default)]
    pub passport: String,
    pub alert_message: String,
    pub latitude: i64,
    pub longitude: i64,
    pub timestamp: i64,
}

impl std::fmt::Debug for UserAlertLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAlertLog")
            .field("user_address", &self.user_address)
            .field("name", &self.name)
            .field("alert_message", &self.alert_message)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

/// A decoded contract event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum ChainEvent {
    ZoneAlert(ZoneAlertLog),
    #[serde(rename = "AlertEvent")]
    UserAlert(UserAlertLog),
}

impl ChainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZoneAlert(_) => "ZoneAlert",
            Self::UserAlert(_) => "AlertEvent",
        }
    }

    /// Map to an in-app alert.
    pub fn to_alert(&self) -> AlertEvent {
        match self {
            Self::ZoneAlert(log) => zone_alert(log),
            Self::UserAlert(log) => user_alert(log),
        }
    }
}

/// Title is the alert type, or "Zone Alert" when empty.
pub fn zone_alert(log: &ZoneAlertLog) -> AlertEvent {
    let title = if log.alert_type.is_empty() {
        "Zone Alert"
    } else {
        log.alert_type.as_str()
    };
    AlertEvent::new(AlertCategory::Zone, title, log.alert_message.as_str())
        .with_timestamp(log.timestamp)
        .with_meta("latitude", log.latitude)
        .with_meta("longitude", log.longitude)
        .with_meta("radius", log.radius)
}

/// Keeps name, message, address and position; drops the rest.
pub fn user_alert(log: &UserAlertLog) -> AlertEvent {
    AlertEvent::new(
        AlertCategory::User,
        format!("User Alert: {}", log.name),
        log.alert_message.as_str(),
    )
    .with_timestamp(log.timestamp)
    .with_meta("userAddress", log.user_address.to_string())
    .with_meta("latitude", log.latitude)
    .with_meta("longitude", log.longitude)
}
