use async_trait::async_trait;

use crate::PendingRequest;

/// Trait for replaying queued requests through the host's HTTP client.
///
/// The drain controller calls [`dispatch`](Transport::dispatch) once per queued
/// record and waits for the outcome before taking the next one. The transport
/// interprets the record's timeout; the core never enforces it.
///
/// # Examples
///
/// ```rust,ignore
/// use offline_core::{PendingRequest, Transport};
///
/// struct Recorder;
///
/// #[async_trait::async_trait]
/// impl Transport for Recorder {
///     type Response = u16;
///     type Error = std::io::Error;
///
///     async fn dispatch(&self, request: &PendingRequest) -> Result<u16, std::io::Error> {
///         println!("{} {}", request.method(), request.url());
///         Ok(200)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Successful replay result broadcast to subscribers.
    type Response: Send + Sync + 'static;

    /// Replay failure broadcast to subscribers.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue the stored request.
    async fn dispatch(&self, request: &PendingRequest) -> Result<Self::Response, Self::Error>;

    /// Whether `error` means the request was put back in the queue instead of
    /// being sent.
    ///
    /// Transports that replay through the intercepting client return `true`
    /// when reachability dropped mid-drain and the record was re-queued; the
    /// drain controller then stops the cycle.
    fn is_requeued(&self, _error: &Self::Error) -> bool {
        false
    }
}

#[async_trait]
impl<T> Transport for std::sync::Arc<T>
where
    T: Transport + ?Sized,
{
    type Response = T::Response;
    type Error = T::Error;

    async fn dispatch(&self, request: &PendingRequest) -> Result<Self::Response, Self::Error> {
        (**self).dispatch(request).await
    }

    fn is_requeued(&self, error: &Self::Error) -> bool {
        (**self).is_requeued(error)
    }
}
