//! Ledger client adapters

pub mod json_rpc;
pub mod memory;

pub use json_rpc::{JsonRpcConfig, JsonRpcLedgerClient};
pub use memory::InMemoryLedger;
