//! Error taxonomy for remote cart synchronization.
//!
//! The cart reducer itself never fails; every failure exit lives here,
//! surfaced as a value so the UI can render inline feedback without
//! unwinding. A failed mutation always leaves the displayed cart
//! exactly as it was before the attempt.

use thiserror::Error;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Failure modes of a remote cart operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote service rejected the session credential (401-equivalent).
    ///
    /// The adapter clears the stored credential; the caller should send
    /// the user back through authentication.
    #[error("session is no longer authenticated")]
    Unauthorized,

    /// The server rejected the mutation (validation or business rule,
    /// e.g. quantity exceeds stock). The message is user-facing.
    #[error("cart request rejected: {message}")]
    Rejected {
        /// Server-provided, user-visible reason
        message: String,
    },

    /// Network failure, timeout, or server error. Retryable; no retry
    /// happens at this layer.
    #[error("cart service unavailable: {message}")]
    Transient {
        /// Transport-level detail for logging
        message: String,
    },
}

impl SyncError {
    /// Whether the caller may usefully retry the operation as-is
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Whether this failure invalidated the session credential
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
