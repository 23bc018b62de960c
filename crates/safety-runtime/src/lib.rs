//! # Safety Runtime Library
//!
//! Wires the tourist-safety subsystems together. The binary in `main.rs`
//! reads JSON commands from stdin; tests drive [`SafetyRuntime`] directly.
//!
//! ```text
//!   stdin (JSON lines)
//!        │
//!        ↓
//!  CommandHandler ──signal/fix──→ GeofenceMonitor(1) ──→ AlertDispatcher(2) ──→ AlertBus
//!        │                                                   ↑      │
//!        ├──chain──→ AlertFeed(3) ───────────────────────────┘      └──→ Ledger (JSON-RPC)
//!        │
//!        └──fix──→ TrackingService(4) ──→ Backend (/ingest)
//! ```

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, SafetyConfig, SubsystemContainer};
pub use handlers::{Command, RegionOutline, Reply};
pub use runtime::SafetyRuntime;
