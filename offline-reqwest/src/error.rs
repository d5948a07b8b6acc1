use http::StatusCode;
use offline::OfflineError;

/// Failure of a replayed request.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The server answered with a non-success status.
    #[error("replayed request failed with status {status}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body.
        body: bytes::Bytes,
    },
    /// The client or a middleware failed, including a replay that was queued
    /// again because the network went away.
    #[error(transparent)]
    Middleware(#[from] reqwest_middleware::Error),
}

impl ReplayError {
    /// Whether the replay was put back in the queue.
    pub fn is_request_queued(&self) -> bool {
        match self {
            ReplayError::Middleware(error) => is_request_queued(error),
            ReplayError::Status { .. } => false,
        }
    }

    /// Response status, for failures reported by the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ReplayError::Status { status, .. } => Some(*status),
            ReplayError::Middleware(error) => error.status(),
        }
    }
}

/// Whether `error` is [`OfflineError::RequestQueued`] raised by
/// [`OfflineMiddleware`](crate::OfflineMiddleware).
pub fn is_request_queued(error: &reqwest_middleware::Error) -> bool {
    match error {
        reqwest_middleware::Error::Middleware(error) => error
            .downcast_ref::<OfflineError>()
            .is_some_and(OfflineError::is_request_queued),
        reqwest_middleware::Error::Reqwest(_) => false,
    }
}
