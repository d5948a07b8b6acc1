//! Wiring of reachability, interception and draining.

use std::sync::Arc;

use offline_backend::CacheStore;
use offline_core::{NotificationSink, PendingRequest, Reachability, Transport};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::drain::{DrainController, DrainReport};
use crate::policy::{Interception, InterceptionPolicy};
use crate::queue::ReplayQueue;
use crate::request::{CacheSelector, RequestDescriptor};
use crate::{OfflineConfig, OfflineResult};

struct OfflineInner {
    config: Arc<OfflineConfig>,
    reachability: Arc<dyn Reachability>,
    queue: Arc<ReplayQueue>,
    policy: InterceptionPolicy,
}

/// Offline request mediator.
///
/// Cloning is cheap; clones share the configuration, the store and the
/// replay queue.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use http::Method;
/// use offline::{ManualReachability, Offline, OfflineConfig, OfflineError, RequestDescriptor};
/// use offline_moka::MokaStore;
///
/// let config = OfflineConfig::builder().always_offline(true).build();
/// let offline = Offline::new(config, MokaStore::new(1_000), ManualReachability::offline())?;
///
/// let request = RequestDescriptor::new(Method::POST, "https://api.example.com/items");
/// let result = offline.intercept(&request).await;
///
/// assert!(matches!(result, Err(OfflineError::RequestQueued)));
/// assert_eq!(offline.pending().await?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Offline {
    inner: Arc<OfflineInner>,
}

impl Offline {
    /// Creates a mediator over `store` and `reachability`.
    ///
    /// The replay queue cache is created in `store` right away.
    pub fn new<S, R>(config: OfflineConfig, store: S, reachability: R) -> OfflineResult<Self>
    where
        S: CacheStore + 'static,
        R: Reachability + 'static,
    {
        let config = Arc::new(config);
        let store: Arc<dyn CacheStore> = Arc::new(store);
        let reachability: Arc<dyn Reachability> = Arc::new(reachability);
        let queue = Arc::new(ReplayQueue::from_store(store.as_ref(), &config.queue)?);
        let policy = InterceptionPolicy::new(
            config.clone(),
            store,
            reachability.clone(),
            queue.clone(),
        );

        Ok(Offline {
            inner: Arc::new(OfflineInner {
                config,
                reachability,
                queue,
                policy,
            }),
        })
    }

    /// Global configuration.
    pub fn config(&self) -> &OfflineConfig {
        &self.inner.config
    }

    /// Reachability source.
    pub fn reachability(&self) -> &Arc<dyn Reachability> {
        &self.inner.reachability
    }

    /// Whether the network is reachable right now.
    pub fn is_online(&self) -> bool {
        self.inner.reachability.is_online()
    }

    /// The replay queue.
    pub fn queue(&self) -> &ReplayQueue {
        &self.inner.queue
    }

    /// Classifies an outgoing request.
    ///
    /// See [`InterceptionPolicy::intercept`].
    pub async fn intercept(&self, request: &RequestDescriptor) -> OfflineResult<Interception> {
        self.inner.policy.intercept(request).await
    }

    /// Resolves a cache selector against the store.
    pub fn resolve_cache(
        &self,
        selector: &CacheSelector,
    ) -> OfflineResult<Arc<dyn offline_backend::CacheHandle>> {
        self.inner.policy.resolve_cache(selector)
    }

    /// Number of requests waiting for replay.
    pub async fn pending(&self) -> OfflineResult<usize> {
        self.inner.queue.len().await
    }

    /// Requests waiting for replay, in replay order.
    pub async fn pending_requests(&self) -> OfflineResult<Vec<PendingRequest>> {
        self.inner.queue.peek_all().await
    }

    /// Binds `transport` and starts replaying.
    ///
    /// Runs one drain cycle right away, then drains again on every transition
    /// to online until the returned handle is shut down or dropped. Must be
    /// called inside a Tokio runtime.
    pub async fn start<T, N>(&self, transport: T, sink: N) -> OfflineResult<OfflineHandle<T>>
    where
        T: Transport + 'static,
        N: NotificationSink<T::Response, T::Error> + 'static,
    {
        let config = self.inner.config.clone();
        let controller = Arc::new(DrainController::new(
            config.clone(),
            self.inner.queue.clone(),
            self.inner.reachability.clone(),
            transport,
            Arc::new(sink),
        ));

        // Subscribe before the first cycle so no transition is missed.
        let mut transitions = self.inner.reachability.watch();
        let report = controller.run().await?;
        offline_debug!(
            config,
            dispatched = report.dispatched,
            outcome = report.outcome.as_str(),
            "initial drain finished"
        );

        let (stop, mut stopped) = oneshot::channel::<()>();
        let listener_controller = controller.clone();
        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    changed = transitions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let connectivity = *transitions.borrow_and_update();
                        offline_debug!(config, event = connectivity.event_name(), "reachability changed");
                        if !connectivity.is_online() {
                            continue;
                        }
                        if let Err(error) = listener_controller.run().await {
                            warn!(%error, "drain cycle failed");
                        }
                    }
                }
            }
        });

        Ok(OfflineHandle {
            controller,
            stop,
            listener,
        })
    }
}

/// Handle returned by [`Offline::start`].
///
/// Dropping the handle stops listening for reachability transitions once the
/// running cycle, if any, has finished.
pub struct OfflineHandle<T>
where
    T: Transport,
{
    controller: Arc<DrainController<T>>,
    stop: oneshot::Sender<()>,
    listener: JoinHandle<()>,
}

impl<T> OfflineHandle<T>
where
    T: Transport,
{
    /// Runs one drain cycle now.
    ///
    /// Returns a report with [`DrainOutcome::AlreadyDraining`] when a cycle is
    /// already running.
    ///
    /// [`DrainOutcome::AlreadyDraining`]: crate::DrainOutcome::AlreadyDraining
    pub async fn process_queue(&self) -> OfflineResult<DrainReport> {
        self.controller.run().await
    }

    /// Whether a drain cycle is running.
    pub fn is_draining(&self) -> bool {
        self.controller.is_draining()
    }

    /// The drain controller.
    pub fn controller(&self) -> &Arc<DrainController<T>> {
        &self.controller
    }

    /// Stops listening for reachability transitions.
    ///
    /// Waits for a cycle started by a transition to finish; a record taken
    /// from the queue is always dispatched and broadcast.
    pub async fn shutdown(self) {
        let OfflineHandle { stop, listener, .. } = self;
        let _ = stop.send(());
        if let Err(error) = listener.await {
            warn!(%error, "reachability listener ended abnormally");
        }
    }
}
