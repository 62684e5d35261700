//! Error types for document store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure modes of the document store seam.
///
/// Backend-specific errors (transport failures, rejected requests, poisoned
/// locks) are all folded into [`StoreError::Unavailable`]; callers are not
/// expected to distinguish between backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store could not be reached or refused the operation.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the underlying failure.
        reason: String,
    },

    /// A path segment contained characters the store forbids in keys.
    #[error("invalid path segment {segment:?} in path {path:?}")]
    InvalidPath {
        /// The full path that was rejected.
        path: String,
        /// The offending segment.
        segment: String,
    },

    /// A required configuration variable was not set.
    #[error("missing configuration: {variable}")]
    MissingConfig {
        /// Name of the missing environment variable.
        variable: String,
    },

    /// A value could not be serialized to or deserialized from JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Construct an [`StoreError::Unavailable`] from any displayable cause.
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            reason: cause.to_string(),
        }
    }

    /// Returns `true` if retrying the operation could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
