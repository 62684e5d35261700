//! Aggregate results for sequential batch operations.
//!
//! Bulk bans, bulk attendance and checkout all run item by item and never
//! abort mid-batch; callers receive every per-item outcome and must handle
//! partial failure — atomicity is never implied and nothing rolls back.

use crate::error::{RegistrationError, Result};

/// One failed item of a batch.
#[derive(Debug)]
pub struct BatchFailure<T> {
    /// The item that failed.
    pub item: T,
    /// Why it failed.
    pub error: RegistrationError,
}

/// Outcome of a batch operation: which items succeeded, which failed.
#[derive(Debug, Default)]
pub struct BatchOutcome<T> {
    /// Items whose operation succeeded, in batch order.
    pub succeeded: Vec<T>,
    /// Items whose operation failed, in batch order.
    pub failed: Vec<BatchFailure<T>>,
}

impl<T> BatchOutcome<T> {
    /// An empty outcome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Files `item` under succeeded or failed according to `result`.
    pub fn record(&mut self, item: T, result: Result<()>) {
        match result {
            Ok(()) => self.succeeded.push(item),
            Err(error) => self.failed.push(BatchFailure { item, error }),
        }
    }

    /// `true` when every item succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of items processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Collapses the outcome into a `Result`, surfacing partial failure as
    /// [`RegistrationError::PartialBatchFailure`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::PartialBatchFailure`] if any item
    /// failed; the succeeded items are lost in that case, so callers that
    /// need them should inspect the outcome directly instead.
    pub fn into_result(self) -> Result<Vec<T>> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(RegistrationError::PartialBatchFailure {
                failed: self.failed.len(),
                total: self.succeeded.len() + self.failed.len(),
            })
        }
    }
}
