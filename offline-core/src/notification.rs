//! Replay outcome notifications.
//!
//! Every record the drain controller dispatches produces exactly one
//! [`Notification`], broadcast to a [`NotificationSink`] under the event name
//! `offline-request:success` or `offline-request:error`.

use std::fmt;
use std::sync::Arc;

use crate::PendingRequest;

/// Event name for a successful replay.
pub const SUCCESS_EVENT: &str = "offline-request:success";

/// Event name for a failed replay.
pub const ERROR_EVENT: &str = "offline-request:error";

/// Outcome of one replayed request.
///
/// Payloads are reference counted so the notification can be cloned to any
/// number of subscribers.
pub enum Notification<Res, Err> {
    /// The transport returned a response.
    Success {
        /// Response returned by the transport.
        response: Arc<Res>,
        /// The replayed record.
        request: Arc<PendingRequest>,
    },
    /// The transport failed.
    Error {
        /// Error returned by the transport.
        error: Arc<Err>,
        /// The replayed record.
        request: Arc<PendingRequest>,
    },
}

impl<Res, Err> Notification<Res, Err> {
    /// Event name this notification is broadcast under.
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::Success { .. } => SUCCESS_EVENT,
            Notification::Error { .. } => ERROR_EVENT,
        }
    }

    /// The replayed record.
    pub fn request(&self) -> &PendingRequest {
        match self {
            Notification::Success { request, .. } | Notification::Error { request, .. } => request,
        }
    }

    /// Whether this is a success notification.
    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }
}

impl<Res, Err> Clone for Notification<Res, Err> {
    fn clone(&self) -> Self {
        match self {
            Notification::Success { response, request } => Notification::Success {
                response: Arc::clone(response),
                request: Arc::clone(request),
            },
            Notification::Error { error, request } => Notification::Error {
                error: Arc::clone(error),
                request: Arc::clone(request),
            },
        }
    }
}

impl<Res, Err> fmt::Debug for Notification<Res, Err>
where
    Err: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Success { request, .. } => f
                .debug_struct("Notification::Success")
                .field("method", request.method())
                .field("url", &request.url())
                .finish(),
            Notification::Error { error, request } => f
                .debug_struct("Notification::Error")
                .field("method", request.method())
                .field("url", &request.url())
                .field("error", &format_args!("{error}"))
                .finish(),
        }
    }
}

/// Receiver of replay outcome notifications.
pub trait NotificationSink<Res, Err>: Send + Sync {
    /// Publish one notification to all subscribers.
    fn broadcast(&self, notification: Notification<Res, Err>);
}

impl<Res, Err, F> NotificationSink<Res, Err> for F
where
    F: Fn(Notification<Res, Err>) + Send + Sync,
{
    fn broadcast(&self, notification: Notification<Res, Err>) {
        self(notification)
    }
}
