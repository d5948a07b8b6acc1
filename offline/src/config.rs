//! Global policy configuration.
//!
//! [`OfflineConfig`] is an immutable snapshot built before the mediator
//! starts and shared by `Arc` afterwards.

use std::collections::BTreeSet;

use offline_core::CacheId;
use serde::{Deserialize, Serialize};

/// Default name of the cache holding the replay queue.
pub const DEFAULT_QUEUE_CACHE: &str = "offline-request-stack";

/// Default key of the replay queue inside its cache.
pub const DEFAULT_QUEUE_KEY: &str = "stack";

/// Default name of the response cache used when a request does not select one.
pub const DEFAULT_RESPONSE_CACHE: &str = "http";

/// Location of the replay queue.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    /// Cache the queue is stored in.
    pub cache: CacheId,
    /// Reserved key holding the queue snapshot.
    pub key: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            cache: CacheId::new_static(DEFAULT_QUEUE_CACHE),
            key: DEFAULT_QUEUE_KEY.to_owned(),
        }
    }
}

/// Global mediator configuration.
///
/// # Example
///
/// ```
/// use offline::OfflineConfig;
///
/// let config = OfflineConfig::builder()
///     .always_offline(true)
///     .exclude_cache_id("no-offline")
///     .build();
///
/// assert!(config.always_offline);
/// assert!(config.is_excluded(&"no-offline".into()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct OfflineConfig {
    /// Emit decision and drain log lines.
    pub debug: bool,
    /// Evict the cached response on every online GET.
    pub always_refresh: bool,
    /// Handle requests without an explicit offline flag as offline-eligible.
    pub always_offline: bool,
    /// Caches whose requests always pass through.
    pub exclude_cache_ids: BTreeSet<CacheId>,
    /// Response cache used when a request selects the default one.
    pub default_cache: CacheId,
    /// Where the replay queue lives.
    pub queue: QueueConfig,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            always_refresh: false,
            always_offline: false,
            exclude_cache_ids: BTreeSet::new(),
            default_cache: CacheId::new_static(DEFAULT_RESPONSE_CACHE),
            queue: QueueConfig::default(),
        }
    }
}

impl OfflineConfig {
    /// Creates a new [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether requests using cache `id` bypass the mediator.
    pub fn is_excluded(&self, id: &CacheId) -> bool {
        self.exclude_cache_ids.contains(id)
    }
}

/// Builder for [`OfflineConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: OfflineConfig,
}

impl ConfigBuilder {
    /// Enables decision and drain log lines.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Evict cached responses on every online GET.
    pub fn always_refresh(mut self, enabled: bool) -> Self {
        self.config.always_refresh = enabled;
        self
    }

    /// Treat requests without an explicit flag as offline-eligible.
    pub fn always_offline(mut self, enabled: bool) -> Self {
        self.config.always_offline = enabled;
        self
    }

    /// Adds one cache to the exclusion set.
    pub fn exclude_cache_id(mut self, id: impl Into<CacheId>) -> Self {
        self.config.exclude_cache_ids.insert(id.into());
        self
    }

    /// Replaces the exclusion set.
    pub fn exclude_cache_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CacheId>,
    {
        self.config.exclude_cache_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default response cache.
    pub fn default_cache(mut self, id: impl Into<CacheId>) -> Self {
        self.config.default_cache = id.into();
        self
    }

    /// Sets the cache holding the replay queue.
    pub fn queue_cache(mut self, id: impl Into<CacheId>) -> Self {
        self.config.queue.cache = id.into();
        self
    }

    /// Sets the key of the replay queue.
    pub fn queue_key(mut self, key: impl Into<String>) -> Self {
        self.config.queue.key = key.into();
        self
    }

    /// Builds the configuration snapshot.
    pub fn build(self) -> OfflineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OfflineConfig::default();
        assert!(!config.debug);
        assert!(!config.always_refresh);
        assert!(!config.always_offline);
        assert!(config.exclude_cache_ids.is_empty());
        assert_eq!(config.default_cache.as_str(), "http");
        assert_eq!(config.queue.cache.as_str(), "offline-request-stack");
        assert_eq!(config.queue.key, "stack");
    }

    #[test]
    fn test_partial_deserialization() {
        let config: OfflineConfig = serde_json::from_str(
            r#"{"always_offline": true, "exclude_cache_ids": ["a", "b"], "queue": {"key": "q"}}"#,
        )
        .unwrap();
        assert!(config.always_offline);
        assert!(config.is_excluded(&CacheId::from("a")));
        assert!(!config.is_excluded(&CacheId::from("http")));
        assert_eq!(config.queue.cache.as_str(), "offline-request-stack");
        assert_eq!(config.queue.key, "q");
    }

    #[test]
    fn test_builder_replaces_exclusions() {
        let config = OfflineConfig::builder()
            .exclude_cache_id("old")
            .exclude_cache_ids(["x", "y"])
            .build();
        assert_eq!(config.exclude_cache_ids.len(), 2);
        assert!(!config.is_excluded(&CacheId::from("old")));
    }
}
