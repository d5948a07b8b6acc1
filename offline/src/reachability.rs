//! Reachability sources.
//!
//! - [`ManualReachability`] is driven by the host, for example from platform
//!   network-change callbacks.
//! - [`ProbeReachability`] periodically opens a TCP connection to a known
//!   address and reports whether it succeeded.

use std::sync::Arc;
use std::time::Duration;

use offline_core::{Connectivity, Reachability};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Reachability state set explicitly by the host.
///
/// ```
/// use offline::ManualReachability;
/// use offline_core::Reachability;
///
/// let reachability = ManualReachability::offline();
/// assert!(!reachability.is_online());
///
/// reachability.go_online();
/// assert!(reachability.is_online());
/// ```
#[derive(Debug)]
pub struct ManualReachability {
    sender: watch::Sender<Connectivity>,
}

impl ManualReachability {
    /// Source starting in `initial`.
    pub fn new(initial: Connectivity) -> Self {
        let (sender, _) = watch::channel(initial);
        ManualReachability { sender }
    }

    /// Source starting online.
    pub fn online() -> Self {
        Self::new(Connectivity::Online)
    }

    /// Source starting offline.
    pub fn offline() -> Self {
        Self::new(Connectivity::Offline)
    }

    /// Sets the state. Subscribers are notified only on an actual transition.
    ///
    /// Returns `true` when the state changed.
    pub fn set(&self, connectivity: Connectivity) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == connectivity {
                false
            } else {
                *current = connectivity;
                true
            }
        })
    }

    /// Reports an `online` transition.
    pub fn go_online(&self) -> bool {
        self.set(Connectivity::Online)
    }

    /// Reports an `offline` transition.
    pub fn go_offline(&self) -> bool {
        self.set(Connectivity::Offline)
    }
}

impl Default for ManualReachability {
    fn default() -> Self {
        Self::online()
    }
}

impl Reachability for ManualReachability {
    fn connectivity(&self) -> Connectivity {
        *self.sender.borrow()
    }

    fn watch(&self) -> watch::Receiver<Connectivity> {
        self.sender.subscribe()
    }
}

/// Reachability derived from periodic TCP connect probes.
///
/// The source starts offline and runs its first probe immediately. The probe
/// task stops when the source is dropped.
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() {
/// use std::time::Duration;
/// use offline::ProbeReachability;
///
/// let reachability = ProbeReachability::builder("api.example.com:443")
///     .interval(Duration::from_secs(10))
///     .timeout(Duration::from_secs(2))
///     .spawn();
/// # }
/// ```
#[derive(Debug)]
pub struct ProbeReachability {
    state: Arc<ManualReachability>,
    task: JoinHandle<()>,
}

impl ProbeReachability {
    /// Creates a [`ProbeBuilder`] probing `target` (`host:port`).
    pub fn builder(target: impl Into<String>) -> ProbeBuilder {
        ProbeBuilder {
            target: target.into(),
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(2),
        }
    }

    /// Attempts one TCP connection to `target`.
    pub async fn probe(target: &str, timeout: Duration) -> Connectivity {
        match tokio::time::timeout(timeout, TcpStream::connect(target)).await {
            Ok(Ok(_)) => Connectivity::Online,
            Ok(Err(error)) => {
                debug!(addr = target, %error, "reachability probe failed");
                Connectivity::Offline
            }
            Err(_) => {
                debug!(addr = target, ?timeout, "reachability probe timed out");
                Connectivity::Offline
            }
        }
    }
}

impl Reachability for ProbeReachability {
    fn connectivity(&self) -> Connectivity {
        self.state.connectivity()
    }

    fn watch(&self) -> watch::Receiver<Connectivity> {
        self.state.watch()
    }
}

impl Drop for ProbeReachability {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Builder for [`ProbeReachability`].
#[derive(Debug, Clone)]
pub struct ProbeBuilder {
    target: String,
    interval: Duration,
    timeout: Duration,
}

impl ProbeBuilder {
    /// Time between probes.
    ///
    /// Default: 5 seconds
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Connect timeout of a single probe.
    ///
    /// Default: 2 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Starts the probe task on the current Tokio runtime.
    pub fn spawn(self) -> ProbeReachability {
        let state = Arc::new(ManualReachability::offline());
        let probe_state = state.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let connectivity = ProbeReachability::probe(&self.target, self.timeout).await;
                if probe_state.set(connectivity) {
                    debug!(addr = %self.target, %connectivity, "reachability changed");
                }
            }
        });
        ProbeReachability { state, task }
    }
}
