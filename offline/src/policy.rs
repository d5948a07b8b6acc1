//! Interception policy.
//!
//! Classifies each outgoing request into one of three outcomes:
//!
//! | Request | Online | Offline |
//! |---------|--------|---------|
//! | not eligible or excluded cache | pass through | pass through |
//! | eligible GET | maintenance, then cache path | cache path |
//! | eligible non-GET | pass through | queue, then reject |
//!
//! A request is eligible when its offline flag is `true`, or when the flag is
//! unset and `always_offline` is enabled.

use std::sync::Arc;

use offline_backend::{CacheHandle, CacheStore};
use offline_core::{CacheId, Reachability};
use tracing::warn;

use crate::queue::ReplayQueue;
use crate::request::{CacheSelector, RequestDescriptor};
use crate::{OfflineConfig, OfflineError, OfflineResult, maintenance};

/// Outcome of [`InterceptionPolicy::intercept`] for a request that may proceed.
///
/// Queued requests are reported as `Err(OfflineError::RequestQueued)`.
#[derive(Clone)]
pub enum Interception {
    /// Send the request unmodified, without touching any cache.
    PassThrough,
    /// Send the request through the response cache.
    ///
    /// A hit on `key` may be served instead of dispatching.
    Cached {
        /// Resolved response cache.
        cache: Arc<dyn CacheHandle>,
        /// Identifier reported by the resolved cache.
        id: CacheId,
        /// Cache key, the request URL.
        key: String,
    },
}

impl Interception {
    /// Whether the request bypasses the mediator entirely.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Interception::PassThrough)
    }

    /// The resolved response cache, on the cache path.
    pub fn cache(&self) -> Option<&Arc<dyn CacheHandle>> {
        match self {
            Interception::PassThrough => None,
            Interception::Cached { cache, .. } => Some(cache),
        }
    }
}

impl std::fmt::Debug for Interception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interception::PassThrough => f.write_str("PassThrough"),
            Interception::Cached { id, key, .. } => f
                .debug_struct("Cached")
                .field("id", id)
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}

/// Decision function over the global configuration, the cache store and the
/// reachability source.
pub struct InterceptionPolicy {
    config: Arc<OfflineConfig>,
    store: Arc<dyn CacheStore>,
    reachability: Arc<dyn Reachability>,
    queue: Arc<ReplayQueue>,
}

impl InterceptionPolicy {
    /// Creates the policy.
    pub fn new(
        config: Arc<OfflineConfig>,
        store: Arc<dyn CacheStore>,
        reachability: Arc<dyn Reachability>,
        queue: Arc<ReplayQueue>,
    ) -> Self {
        InterceptionPolicy {
            config,
            store,
            reachability,
            queue,
        }
    }

    /// Classifies `request`.
    ///
    /// Eligible non-GET requests issued while offline are appended to the
    /// replay queue and reported as [`OfflineError::RequestQueued`] once the
    /// record is stored.
    pub async fn intercept(&self, request: &RequestDescriptor) -> OfflineResult<Interception> {
        let config = &self.config;
        if !request.offline().is_eligible(config.always_offline) {
            offline_debug!(
                config,
                method = %request.method(),
                url = request.url(),
                flag = ?request.offline(),
                "not offline-eligible, passing through"
            );
            return Ok(Interception::PassThrough);
        }

        let cache = self.resolve_cache(request.cache())?;
        let cache_id = cache.info(None).await?.id;
        if config.is_excluded(&cache_id) {
            offline_debug!(
                config,
                method = %request.method(),
                url = request.url(),
                cache = %cache_id,
                "cache excluded, passing through"
            );
            return Ok(Interception::PassThrough);
        }

        let online = self.reachability.is_online();
        if request.is_get() {
            if online {
                if let Err(error) = maintenance::clean(config, cache.as_ref(), request.url()).await
                {
                    warn!(cache = %cache_id, url = request.url(), %error, "cache maintenance failed");
                }
            }
            offline_debug!(
                config,
                url = request.url(),
                cache = %cache_id,
                online,
                "GET through response cache"
            );
            return Ok(Interception::Cached {
                cache,
                id: cache_id,
                key: request.url().to_owned(),
            });
        }

        if !online {
            let queued = self.queue.append(request.to_pending()).await?;
            crate::metrics::record_queued();
            offline_debug!(
                config,
                method = %request.method(),
                url = request.url(),
                queued,
                "offline, request queued"
            );
            return Err(OfflineError::RequestQueued);
        }

        Ok(Interception::PassThrough)
    }

    /// Resolves a selector to a cache handle.
    pub fn resolve_cache(&self, selector: &CacheSelector) -> OfflineResult<Arc<dyn CacheHandle>> {
        let cache = match selector {
            CacheSelector::Default => self.store.get_or_create(&self.config.default_cache)?,
            CacheSelector::Named(id) => self.store.get_or_create(id)?,
            CacheSelector::Handle(handle) => handle.clone(),
        };
        Ok(cache)
    }
}
