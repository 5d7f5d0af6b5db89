//! History backend error types.
//!
//! Defined in `cogtrack-core` so the trend analyzer can classify failures
//! from any `HistoryProvider` implementation without string matching.

use thiserror::Error;

/// Errors that can occur when fetching a subject's score history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The backing store could not be reached or read.
    #[error("history backend unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded.
    #[error("malformed history record: {0}")]
    Malformed(String),

    /// The subject has no record in the store at all.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// An I/O error from a file-backed store.
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HistoryError {
    /// Returns `true` if retrying the same fetch cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            HistoryError::Malformed(_) | HistoryError::UnknownUser(_)
        )
    }
}
