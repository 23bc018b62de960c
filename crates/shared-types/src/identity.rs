//! # Identity
//!
//! The wallet address that identifies the tourist on the ledger and to the
//! AI backend. Key storage and signing live behind this trait.

use crate::entities::WalletAddress;

/// Source of the current user's wallet identity.
///
/// Returns `None` when the user has not connected a wallet or completed
/// registration; callers decide whether that means "skip" or "fail".
pub trait IdentityProvider: Send + Sync {
    /// The wallet address of the authenticated user, if any.
    fn wallet_address(&self) -> Option<WalletAddress>;
}

/// Fixed identity, configured at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    address: Option<WalletAddress>,
}

impl StaticIdentity {
    /// Identity backed by a known address.
    #[must_use]
    pub fn new(address: WalletAddress) -> Self {
        Self {
            address: Some(address),
        }
    }

    /// No authenticated user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { address: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn wallet_address(&self) -> Option<WalletAddress> {
        self.address
    }
}
