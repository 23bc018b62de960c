//! Alert feed domain

pub mod abi;
pub mod events;

pub use abi::{decode_log, event_topic_hex, USER_ALERT_SIGNATURE, ZONE_ALERT_SIGNATURE};
pub use events::{user_alert, zone_alert, ChainEvent, UserAlertLog, ZoneAlertLog};
