//! Error taxonomy for registration operations.

use crate::state::{EventId, UserId};
use gatepass_store::StoreError;
use thiserror::Error;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// All failure modes surfaced by the registration core.
///
/// Store-level failures are caught at each operation boundary and wrapped
/// in [`RegistrationError::StoreUnavailable`]; no raw I/O error ever
/// reaches a caller. Batch operations additionally report aggregate
/// outcomes through [`crate::BatchOutcome`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The event has reached its capacity cap.
    #[error("event {event_id} is at full capacity")]
    CapacityExceeded {
        /// The full event.
        event_id: EventId,
    },

    /// The event was deactivated and is no longer orderable.
    #[error("event {event_id} is no longer available")]
    EventInactive {
        /// The inactive event.
        event_id: EventId,
    },

    /// No such event exists in the catalog.
    #[error("event {event_id} does not exist")]
    EventNotFound {
        /// The unknown event.
        event_id: EventId,
    },

    /// The caller is not signed in.
    #[error("not authenticated")]
    NotAuthenticated,

    /// No registration exists for the `(user, event)` pair.
    #[error("user {user_id} is not registered for event {event_id}")]
    NotRegistered {
        /// The user.
        user_id: UserId,
        /// The event.
        event_id: EventId,
    },

    /// The underlying document store failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Some items of a batch operation failed; see the accompanying
    /// [`crate::BatchOutcome`] for which.
    #[error("{failed} of {total} operations in the batch failed")]
    PartialBatchFailure {
        /// Number of failed items.
        failed: usize,
        /// Batch size.
        total: usize,
    },
}

impl From<serde_json::Error> for RegistrationError {
    fn from(error: serde_json::Error) -> Self {
        Self::StoreUnavailable(StoreError::Serialization(error))
    }
}

impl RegistrationError {
    /// Returns `true` if the failure is a consequence of the caller's
    /// input or timing rather than a system fault.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::EventInactive { .. }
                | Self::EventNotFound { .. }
                | Self::NotAuthenticated
                | Self::NotRegistered { .. }
        )
    }
}
