//! Store of named Moka caches.

use std::sync::Arc;

use dashmap::DashMap;
use offline_backend::{BackendResult, CacheHandle, CacheStore};
use offline_core::CacheId;
use tracing::debug;

use crate::builder::{CacheSettings, MokaStoreBuilder, NoCapacity};
use crate::cache::MokaCache;

/// In-memory [`CacheStore`] handing out one [`MokaCache`] per name.
///
/// # Caveats
///
/// - Data is **not persisted**; the replay queue is lost on restart. Use the
///   FeOxDB store when queued requests must survive the process.
/// - Capacity settings apply to each cache separately.
pub struct MokaStore {
    pub(crate) caches: DashMap<CacheId, Arc<MokaCache>>,
    pub(crate) settings: CacheSettings,
    pub(crate) name: String,
}

impl MokaStore {
    /// Creates a [`MokaStoreBuilder`].
    pub fn builder() -> MokaStoreBuilder<NoCapacity> {
        MokaStoreBuilder::default()
    }

    /// Store whose caches hold at most `max_entries` entries each.
    pub fn new(max_entries: u64) -> Self {
        Self::builder().max_entries(max_entries).build()
    }

    /// Typed access to a cache created earlier.
    pub fn cache(&self, name: &CacheId) -> Option<Arc<MokaCache>> {
        self.caches.get(name).map(|entry| entry.value().clone())
    }

    /// Number of caches created so far.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Whether no cache was created yet.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

impl CacheStore for MokaStore {
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>> {
        let cache = self
            .caches
            .entry(name.clone())
            .or_insert_with(|| {
                debug!(store = %self.name, cache = %name, "creating cache");
                Arc::new(MokaCache::with_settings(name.clone(), &self.settings))
            })
            .value()
            .clone();
        Ok(cache)
    }

    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>> {
        self.cache(name).map(|cache| cache as Arc<dyn CacheHandle>)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
