//! Per-request options carried in request extensions.

use std::time::Duration;

use offline::CacheSelector;
use offline_core::OfflineFlag;

/// Offline options for a single request.
///
/// Attach with `RequestBuilder::with_extension`. Requests without options
/// use [`OfflineFlag::Unset`] and the default response cache.
///
/// ```
/// use std::time::Duration;
/// use offline_reqwest::OfflineOptions;
///
/// let options = OfflineOptions::offline()
///     .with_cache("users")
///     .with_ttl(Duration::from_secs(300));
/// assert!(options.ttl().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OfflineOptions {
    offline: OfflineFlag,
    cache: CacheSelector,
    ttl: Option<Duration>,
}

impl OfflineOptions {
    /// Options with the given flag.
    pub fn new(offline: impl Into<OfflineFlag>) -> Self {
        OfflineOptions {
            offline: offline.into(),
            ..Default::default()
        }
    }

    /// `offline: true`.
    pub fn offline() -> Self {
        Self::new(OfflineFlag::Offline)
    }

    /// `offline: false`, the request always passes through.
    pub fn online() -> Self {
        Self::new(OfflineFlag::Online)
    }

    /// Selects the response cache.
    pub fn with_cache(mut self, cache: impl Into<CacheSelector>) -> Self {
        self.cache = cache.into();
        self
    }

    /// Overrides the middleware's time-to-live for the cached response.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Per-request offline flag.
    pub fn flag(&self) -> OfflineFlag {
        self.offline
    }

    /// Selected response cache.
    pub fn cache(&self) -> &CacheSelector {
        &self.cache
    }

    /// Time-to-live override, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}
