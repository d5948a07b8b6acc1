//! Expiry-driven eviction on the online GET path.

use offline_backend::{CacheHandle, DeleteStatus};

use crate::{OfflineConfig, OfflineResult};

/// Evicts `key` from `cache` when it must be refetched.
///
/// The entry is removed when `always_refresh` is set or the cache reports it
/// as expired. Returns the delete status, or `None` when the entry was kept.
pub async fn clean(
    config: &OfflineConfig,
    cache: &dyn CacheHandle,
    key: &str,
) -> OfflineResult<Option<DeleteStatus>> {
    let info = cache.info(Some(key)).await?;
    if !config.always_refresh && !info.expired() {
        return Ok(None);
    }

    let status = cache.remove(key).await?;
    offline_debug!(
        config,
        cache = %info.id,
        key,
        always_refresh = config.always_refresh,
        deleted = status.is_deleted(),
        "evicted cached response"
    );
    if status.is_deleted() {
        crate::metrics::record_eviction(info.id.as_str());
    }
    Ok(Some(status))
}
