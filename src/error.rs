use thiserror::Error;

use crate::lock::LockError;

/// Error type for every engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A rating carried a score outside `[1, 5]`.
    #[error("invalid rating {id}: {reason}")]
    InvalidRating { id: String, reason: String },

    /// Optimistic concurrency conflict on a subject document.
    #[error(
        "concurrent write detected for subject {subject_id} (expected version {expected}, got {actual})"
    )]
    ConcurrencyConflict {
        subject_id: String,
        expected: u64,
        actual: u64,
    },

    /// A subject document already exists.
    #[error("subject {0} already exists")]
    AlreadyExists(String),

    /// Storage-level failure (backend unavailable, poisoned map, ...).
    #[error("storage error: {0}")]
    Storage(String),

    /// Encoding or decoding of a stored document failed.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn invalid_rating(id: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidRating {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<bitcode::Error> for EngineError {
    fn from(err: bitcode::Error) -> Self {
        EngineError::Serde(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serde(err.to_string())
    }
}
