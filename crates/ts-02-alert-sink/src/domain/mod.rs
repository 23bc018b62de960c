//! Alert sink domain

pub mod abi;
pub mod coordinates;
pub mod notification;

pub use abi::{encode_alert_call, selector, to_hex_data, ALERT_SIGNATURE};
pub use coordinates::CoordinateEncoding;
pub use notification::{Notification, NotificationCenter};
