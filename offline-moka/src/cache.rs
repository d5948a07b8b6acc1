//! Single named Moka cache.

use async_trait::async_trait;
use moka::future::Cache;
use offline_backend::{BackendResult, CacheHandle, CacheInfo, DeleteStatus};
use offline_core::{CacheId, CacheValue, Raw};

use crate::builder::CacheSettings;

/// One named in-memory cache created by [`MokaStore`](crate::MokaStore).
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct MokaCache {
    id: CacheId,
    cache: Cache<String, CacheValue<Raw>>,
}

impl MokaCache {
    /// Creates a standalone cache holding at most `max_entries` entries.
    ///
    /// Expired entries are kept until removed, like the store default.
    pub fn new(id: impl Into<CacheId>, max_entries: u64) -> Self {
        Self::with_settings(id.into(), &CacheSettings::entries(max_entries))
    }

    pub(crate) fn with_settings(id: CacheId, settings: &CacheSettings) -> Self {
        MokaCache {
            id,
            cache: settings.build_cache(),
        }
    }

    /// Identifier of this cache.
    pub fn id(&self) -> &CacheId {
        &self.id
    }

    /// The underlying Moka cache.
    pub fn cache(&self) -> &Cache<String, CacheValue<Raw>> {
        &self.cache
    }

    fn record_capacity(&self) {
        crate::metrics::record_capacity(
            self.id.as_str(),
            self.cache.entry_count(),
            self.cache.weighted_size(),
        );
    }
}

#[async_trait]
impl CacheHandle for MokaCache {
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()> {
        self.cache.insert(key.to_owned(), value).await;
        self.record_capacity();
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        let status = match self.cache.remove(key).await {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        };
        self.record_capacity();
        Ok(status)
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        let info = CacheInfo::new(self.id.clone()).with_size(self.cache.entry_count() as usize);
        let Some(key) = key else {
            return Ok(info);
        };
        let is_expired = self.cache.get(key).await.map(|value| value.is_expired());
        Ok(info.with_expired(is_expired))
    }
}
