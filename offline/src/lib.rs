#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # offline
//!
//! Offline-tolerant HTTP request mediator.
//!
//! For every outgoing request the mediator decides whether to pass it
//! through, send it through the response cache, or store it in a durable
//! replay queue and reject it with [`OfflineError::RequestQueued`]. When the
//! network becomes reachable again the queued requests are replayed one at a
//! time, in the order they were issued, and each outcome is broadcast as an
//! `offline-request:success` or `offline-request:error` notification.
//!
//! ```text
//! request ──► InterceptionPolicy ──► pass through / response cache
//!                    │
//!                    └── offline, mutating ──► ReplayQueue ──► RequestQueued
//!
//! reachability "online" ──► DrainController ──► Transport ──► NotificationSink
//! ```
//!
//! The HTTP client, the cache store, the reachability signal and the
//! notification channel are consumed through the traits in `offline-core`
//! and `offline-backend`; `offline-reqwest` binds them to `reqwest`.

macro_rules! offline_debug {
    ($config:expr, $($arg:tt)+) => {
        if $config.debug {
            ::tracing::debug!($($arg)+);
        }
    };
}

/// Global policy configuration.
///
/// Defines [`OfflineConfig`] with:
/// - **always_offline** - treat requests without an explicit flag as eligible
/// - **always_refresh** - evict cached responses on every online GET
/// - **exclude_cache_ids** - caches whose requests always pass through
/// - **queue** - where the replay queue is stored
pub mod config;

/// Sequential replay of queued requests.
pub mod drain;

/// Error types for mediator operations.
pub mod error;

/// Expiry-driven cache eviction.
pub mod maintenance;

/// Metrics collection for mediator observability.
pub mod metrics;

/// Notification sinks.
pub mod notify;

mod orchestrator;

/// Request classification.
pub mod policy;

/// Durable replay queue.
pub mod queue;

/// Reachability sources.
pub mod reachability;

/// Intercepted request descriptor.
pub mod request;

pub use config::{ConfigBuilder, OfflineConfig, QueueConfig};
pub use drain::{DrainController, DrainOutcome, DrainReport};
pub use error::{OfflineError, OfflineResult};
pub use notify::{BroadcastSink, TracingSink};
pub use orchestrator::{Offline, OfflineHandle};
pub use policy::{Interception, InterceptionPolicy};
pub use queue::ReplayQueue;
pub use reachability::{ManualReachability, ProbeBuilder, ProbeReachability};
pub use request::{CacheSelector, RequestDescriptor};

pub use offline_backend::{CacheHandle, CacheInfo, CacheStore};
pub use offline_core::{
    CacheId, CacheValue, Connectivity, ERROR_EVENT, Notification, NotificationSink, OfflineFlag,
    PendingRequest, Reachability, SUCCESS_EVENT, Transport,
};
