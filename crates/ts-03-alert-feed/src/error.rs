//! Error types for the Alert Feed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// A chain event could not be decoded.
    #[error("Malformed chain event: {0}")]
    Decode(#[from] serde_json::Error),

    /// A contract log did not match either event layout.
    #[error("Malformed contract log: {0}")]
    MalformedLog(String),

    /// Transport failure talking to the node.
    #[error("Node request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The event source has no more events.
    #[error("Event source closed")]
    SourceClosed,
}

pub type FeedResult<T> = Result<T, FeedError>;
