//! Error taxonomy for timer operations

use thiserror::Error;

/// Errors raised by entry store mutations.
///
/// `Validation` is the only user-facing failure mode; it rejects the input
/// without committing anything. `IndexOutOfRange` means a caller addressed
/// an entry that does not exist. Storage faults never appear here - the
/// persistence layer logs and absorbs them (see `storage`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// Bad user input: empty required field or malformed duration.
    #[error("{0}")]
    Validation(String),

    /// No entry exists at the given index.
    #[error("no timer entry at index {0}")]
    IndexOutOfRange(usize),

    /// Internal state error (poisoned lock). Indicates a bug, not user error.
    #[error("internal state error: {0}")]
    Internal(String),
}

impl TimerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
