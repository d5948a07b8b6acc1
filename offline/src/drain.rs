//! Sequential replay of queued requests.
//!
//! ```text
//!            trigger
//!   Idle ─────────────► Draining ──┐
//!    ▲                     │  ▲    │ take_first + dispatch + broadcast
//!    │ offline / empty /   │  └────┘
//!    │ re-queued           │
//!    └─────────────────────┘
//! ```
//!
//! A trigger while a cycle is running returns immediately with
//! [`DrainOutcome::AlreadyDraining`], so at most one replay is in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use offline_core::{Notification, NotificationSink, Reachability, Transport};

use crate::queue::ReplayQueue;
use crate::{OfflineConfig, OfflineError, OfflineResult};

/// Why a drain cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every queued record was replayed.
    QueueEmpty,
    /// Reachability was lost; remaining records stay queued.
    WentOffline,
    /// A replayed request was queued again by the interception layer.
    Requeued,
    /// Another cycle was already running.
    AlreadyDraining,
}

impl DrainOutcome {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            DrainOutcome::QueueEmpty => "queue_empty",
            DrainOutcome::WentOffline => "went_offline",
            DrainOutcome::Requeued => "requeued",
            DrainOutcome::AlreadyDraining => "already_draining",
        }
    }
}

/// Summary of one drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Records taken from the queue and dispatched.
    pub dispatched: usize,
    /// Dispatches that returned a response.
    pub succeeded: usize,
    /// Dispatches that failed.
    pub failed: usize,
    /// Why the cycle ended.
    pub outcome: DrainOutcome,
}

impl DrainReport {
    fn new(outcome: DrainOutcome) -> Self {
        DrainReport {
            dispatched: 0,
            succeeded: 0,
            failed: 0,
            outcome,
        }
    }
}

/// Resets the draining flag when a cycle ends, including on error.
struct DrainGuard<'a> {
    draining: &'a AtomicBool,
}

impl<'a> DrainGuard<'a> {
    fn acquire(draining: &'a AtomicBool) -> Option<Self> {
        draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard { draining })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.draining.store(false, Ordering::Release);
    }
}

/// Replays queued requests through a [`Transport`] while online.
pub struct DrainController<T>
where
    T: Transport,
{
    config: Arc<OfflineConfig>,
    queue: Arc<ReplayQueue>,
    reachability: Arc<dyn Reachability>,
    transport: T,
    sink: Arc<dyn NotificationSink<T::Response, T::Error>>,
    draining: AtomicBool,
}

impl<T> DrainController<T>
where
    T: Transport,
{
    /// Creates an idle controller.
    pub fn new(
        config: Arc<OfflineConfig>,
        queue: Arc<ReplayQueue>,
        reachability: Arc<dyn Reachability>,
        transport: T,
        sink: Arc<dyn NotificationSink<T::Response, T::Error>>,
    ) -> Self {
        DrainController {
            config,
            queue,
            reachability,
            transport,
            sink,
            draining: AtomicBool::new(false),
        }
    }

    /// Whether a cycle is running.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// The bound transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs one drain cycle.
    ///
    /// Records are removed from the queue before they are dispatched and each
    /// outcome is broadcast before the next record is taken. A failed replay
    /// is not queued again by the controller. Store failures end the cycle
    /// with an error; records not yet taken stay queued.
    pub async fn run(&self) -> OfflineResult<DrainReport> {
        let Some(_guard) = DrainGuard::acquire(&self.draining) else {
            offline_debug!(self.config, "drain already running");
            return Ok(DrainReport::new(DrainOutcome::AlreadyDraining));
        };

        let mut report = DrainReport::new(DrainOutcome::QueueEmpty);
        loop {
            if !self.reachability.is_online() {
                report.outcome = DrainOutcome::WentOffline;
                break;
            }

            let request = match self.queue.take_first().await {
                Ok(request) => Arc::new(request),
                Err(OfflineError::EmptyQueue) => {
                    report.outcome = DrainOutcome::QueueEmpty;
                    break;
                }
                Err(error) => return Err(error),
            };
            report.dispatched += 1;

            offline_debug!(
                self.config,
                method = %request.method(),
                url = request.url(),
                "replaying queued request"
            );
            match self.transport.dispatch(&request).await {
                Ok(response) => {
                    report.succeeded += 1;
                    crate::metrics::record_replay(true);
                    self.sink.broadcast(Notification::Success {
                        response: Arc::new(response),
                        request,
                    });
                }
                Err(error) => {
                    report.failed += 1;
                    crate::metrics::record_replay(false);
                    let requeued = self.transport.is_requeued(&error);
                    offline_debug!(
                        self.config,
                        method = %request.method(),
                        url = request.url(),
                        %error,
                        requeued,
                        "replay failed"
                    );
                    self.sink.broadcast(Notification::Error {
                        error: Arc::new(error),
                        request,
                    });
                    if requeued {
                        report.outcome = DrainOutcome::Requeued;
                        break;
                    }
                }
            }
        }

        crate::metrics::record_drain(report.outcome.as_str());
        offline_debug!(
            self.config,
            dispatched = report.dispatched,
            succeeded = report.succeeded,
            failed = report.failed,
            outcome = report.outcome.as_str(),
            "drain cycle finished"
        );
        Ok(report)
    }
}
