//! Ports for the Alert Sink

pub mod inbound;
pub mod outbound;

pub use inbound::{AlertSinkApi, EmergencyApi, RemoteRecordOutcome};
pub use outbound::{AlertCall, LedgerClient, TxReceipt};
