//! Error types for the mediator.

use offline_backend::BackendError;
use thiserror::Error;

/// Errors produced by interception, the replay queue and the drain controller.
#[derive(Debug, Error)]
pub enum OfflineError {
    /// The replay queue has no record to take.
    ///
    /// The drain controller treats it as the end of a cycle.
    #[error("empty stack")]
    EmptyQueue,

    /// The request was stored for replay instead of being sent.
    ///
    /// Returned to the caller of a mutating request issued while offline.
    #[error("request queued")]
    RequestQueued,

    /// The cache store failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The queue snapshot could not be encoded or decoded.
    #[error("queue serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OfflineError {
    /// Whether this is the queued-request sentinel.
    pub fn is_request_queued(&self) -> bool {
        matches!(self, OfflineError::RequestQueued)
    }

    /// Whether this is the empty-queue sentinel.
    pub fn is_empty_queue(&self) -> bool {
        matches!(self, OfflineError::EmptyQueue)
    }
}

/// Result alias for mediator operations.
pub type OfflineResult<T> = Result<T, OfflineError>;
