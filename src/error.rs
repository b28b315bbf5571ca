//! Error types for the moderation core.

use std::time::Duration;

/// A settings or ledger write failed.
///
/// The in-memory state has already been updated when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Removing a member from a group did not succeed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemovalError {
    #[error("removal rejected: {0}")]
    Rejected(String),

    #[error("removal timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid removal target: {0}")]
    InvalidTarget(String),
}
