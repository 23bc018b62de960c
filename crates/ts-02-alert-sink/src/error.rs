//! Error types for the Alert Sink
//!
//! Ledger failures are categorised so callers can show a matching message.
//! None of them ever reaches the geofence state machine.

use thiserror::Error;

/// Ledger write failures, by cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No wallet identity or signer is available.
    #[error("Not authenticated: no wallet identity available")]
    NotAuthenticated,

    /// The contract rejected the caller as unregistered.
    #[error("User not registered")]
    NotRegistered,

    /// The account cannot pay for gas.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Transport failure talking to the node.
    #[error("Network error: {0}")]
    Network(String),

    /// The transaction was mined but reverted, or the call reverted.
    #[error("Transaction reverted: {reason}")]
    Reverted { reason: String },

    /// The node returned a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// No receipt within the configured timeout.
    #[error("Timed out waiting for receipt of {tx_hash}")]
    ReceiptTimeout { tx_hash: String },

    /// The ledger is not configured (disabled, or no contract address).
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Stable label for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::NotRegistered => "not_registered",
            Self::InsufficientFunds(_) => "insufficient_funds",
            Self::Network(_) => "network",
            Self::Reverted { .. } => "reverted",
            Self::Rpc { .. } => "rpc",
            Self::ReceiptTimeout { .. } => "receipt_timeout",
            Self::Unavailable(_) => "unavailable",
        }
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated => {
                "Please connect your wallet and complete registration to use SOS feature."
                    .to_string()
            }
            Self::NotRegistered => {
                "You must be registered to send emergency alerts. Please complete your registration first."
                    .to_string()
            }
            Self::InsufficientFunds(_) => {
                "You don't have enough ETH to send this transaction. Please add funds to your wallet."
                    .to_string()
            }
            other => format!("Failed to send emergency alert: {other}"),
        }
    }

    /// Classify a JSON-RPC error returned by the node.
    pub fn from_rpc(code: i64, message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("insufficient funds") {
            Self::InsufficientFunds(message.to_string())
        } else if lower.contains("user not registered") {
            Self::NotRegistered
        } else if lower.contains("execution reverted") || lower.contains("revert") {
            Self::Reverted {
                reason: message.to_string(),
            }
        } else {
            Self::Rpc {
                code,
                message: message.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Errors from the SOS path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("Location not available")]
    LocationUnavailable,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SinkError {
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationUnavailable => {
                "Location not available. Please enable location services.".to_string()
            }
            Self::Ledger(e) => e.user_message(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;
