//! # Shared Types Crate
//!
//! Domain values that cross subsystem boundaries.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `AlertEvent` is the only alert shape; the
//!   monitor, the chain feed and the notification centre all speak it.
//! - **Validated at the edge**: coordinates, regions and wallet addresses are
//!   validated once when they enter the system (config load, OS callbacks).
//! - **No ambient identity**: the wallet address is always obtained through an
//!   injected `IdentityProvider`, never from a global.

pub mod entities;
pub mod errors;
pub mod identity;

pub use entities::*;
pub use errors::*;
pub use identity::{IdentityProvider, StaticIdentity};

/// Maximum alerts retained by the in-app notification list.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 100;
