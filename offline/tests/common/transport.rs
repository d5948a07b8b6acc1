//! Transport and sink doubles that record what the drain controller does.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use offline::{ManualReachability, Notification, PendingRequest, Transport};
use offline_core::NotificationSink;

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("dispatch of {0} failed")]
    Failed(String),
    #[error("request queued")]
    Requeued,
}

/// Transport returning `200` unless told otherwise, recording dispatch order
/// and the highest number of overlapping dispatches.
#[derive(Default)]
pub struct RecordingTransport {
    dispatched: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: HashSet<String>,
    requeued: HashSet<String>,
    delay: Option<Duration>,
    disconnect: Option<(String, Arc<ManualReachability>)>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatching `url` fails.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_owned());
        self
    }

    /// Dispatching `url` reports a re-queue.
    pub fn requeued(mut self, url: &str) -> Self {
        self.requeued.insert(url.to_owned());
        self
    }

    /// Every dispatch takes `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Dispatching `url` reports an `offline` transition on `reachability`.
    pub fn going_offline(mut self, url: &str, reachability: Arc<ManualReachability>) -> Self {
        self.disconnect = Some((url.to_owned(), reachability));
        self
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    type Response = u16;
    type Error = TestError;

    async fn dispatch(&self, request: &PendingRequest) -> Result<u16, TestError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.dispatched
            .lock()
            .unwrap()
            .push(request.url().to_owned());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some((url, reachability)) = &self.disconnect {
            if url == request.url() {
                reachability.go_offline();
            }
        }

        if self.requeued.contains(request.url()) {
            Err(TestError::Requeued)
        } else if self.failing.contains(request.url()) {
            Err(TestError::Failed(request.url().to_owned()))
        } else {
            Ok(200)
        }
    }

    fn is_requeued(&self, error: &TestError) -> bool {
        matches!(error, TestError::Requeued)
    }
}

/// Sink collecting `(event name, url)` pairs.
#[derive(Clone, Default)]
pub struct CollectingSink {
    events: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(&'static str, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl NotificationSink<u16, TestError> for CollectingSink {
    fn broadcast(&self, notification: Notification<u16, TestError>) {
        self.events
            .lock()
            .unwrap()
            .push((notification.event_name(), notification.request().url().to_owned()));
    }
}
