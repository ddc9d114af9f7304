//! Error types for the game core
//!
//! Nothing here is fatal to a running session: the loop swallows
//! `NotFound` and the leaderboard recovers from corrupt storage.

use thiserror::Error;

use crate::sim::EntityId;

/// Errors raised by the game core and its storage backends
#[derive(Debug, Error)]
pub enum CoreError {
    /// Timed entity was already collected or expired
    #[error("timed entity {0} not found")]
    NotFound(EntityId),

    /// Persisted record exists but cannot be parsed
    #[error("corrupt persisted state: {0}")]
    CorruptPersistedState(String),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a record for storage
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend storage unavailable (e.g. LocalStorage disabled)
    #[error("storage unavailable: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
