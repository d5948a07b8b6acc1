//! Notification sinks for replay outcomes.
//!
//! Any `Fn(Notification<Res, Err>) + Send + Sync` closure is a sink too.

use std::fmt;

use offline_core::{Notification, NotificationSink};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Fans notifications out to any number of Tokio broadcast subscribers.
///
/// Notifications sent while nobody is subscribed are dropped.
pub struct BroadcastSink<Res, Err> {
    sender: broadcast::Sender<Notification<Res, Err>>,
}

impl<Res, Err> BroadcastSink<Res, Err> {
    /// Creates a sink keeping at most `capacity` undelivered notifications per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        BroadcastSink { sender }
    }

    /// Subscribes to notifications broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification<Res, Err>> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<Res, Err> Clone for BroadcastSink<Res, Err> {
    fn clone(&self) -> Self {
        BroadcastSink {
            sender: self.sender.clone(),
        }
    }
}

impl<Res, Err> NotificationSink<Res, Err> for BroadcastSink<Res, Err>
where
    Res: Send + Sync,
    Err: Send + Sync,
{
    fn broadcast(&self, notification: Notification<Res, Err>) {
        let _ = self.sender.send(notification);
    }
}

/// Logs every notification with `tracing`.
///
/// Successes are logged at `info`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl<Res, Err> NotificationSink<Res, Err> for TracingSink
where
    Err: fmt::Display,
{
    fn broadcast(&self, notification: Notification<Res, Err>) {
        let event = notification.event_name();
        match &notification {
            Notification::Success { request, .. } => {
                info!(event, method = %request.method(), url = request.url(), "replayed request");
            }
            Notification::Error { error, request } => {
                warn!(
                    event,
                    method = %request.method(),
                    url = request.url(),
                    %error,
                    "replayed request failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use offline_core::{ERROR_EVENT, PendingRequest, SUCCESS_EVENT};

    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_every_subscriber() {
        let sink: BroadcastSink<u16, std::io::Error> = BroadcastSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        let request = Arc::new(PendingRequest::new(Method::POST, "/a"));
        sink.broadcast(Notification::Success {
            response: Arc::new(201),
            request: request.clone(),
        });
        sink.broadcast(Notification::Error {
            error: Arc::new(std::io::Error::other("boom")),
            request,
        });

        for rx in [&mut first, &mut second] {
            let success = rx.recv().await.unwrap();
            assert_eq!(success.event_name(), SUCCESS_EVENT);
            let error = rx.recv().await.unwrap();
            assert_eq!(error.event_name(), ERROR_EVENT);
            assert_eq!(error.request().url(), "/a");
        }
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let sink: BroadcastSink<u16, std::io::Error> = BroadcastSink::new(1);
        sink.broadcast(Notification::Success {
            response: Arc::new(200),
            request: Arc::new(PendingRequest::new(Method::PUT, "/b")),
        });
        assert_eq!(sink.receiver_count(), 0);
    }
}
