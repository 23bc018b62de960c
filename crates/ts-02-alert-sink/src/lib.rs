//! # ts-02-alert-sink
//!
//! Where alerts end up.
//!
//! - **Notification centre**: newest-first list capped at 100, unread counter.
//! - **Dispatcher**: stores each alert, publishes it on the in-process bus and
//!   performs the best-effort ledger write. Ledger failures come back as
//!   [`RemoteRecordOutcome`] values, never as errors.
//! - **Ledger**: `Alert(string,address,int256,int256)` on a contract, through
//!   the [`LedgerClient`] port. Coordinates are scaled and truncated toward zero.
//! - **SOS**: [`EmergencyAlerter`] records an emergency alert and reports
//!   categorised failures with a user-facing message.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryLedger, JsonRpcConfig, JsonRpcLedgerClient};
pub use domain::{CoordinateEncoding, Notification, NotificationCenter, ALERT_SIGNATURE};
pub use error::{LedgerError, LedgerResult, SinkError, SinkResult};
pub use ports::{AlertCall, AlertSinkApi, EmergencyApi, LedgerClient, RemoteRecordOutcome, TxReceipt};
pub use service::{AlertDispatcher, EmergencyAlerter, SOS_MESSAGE};
