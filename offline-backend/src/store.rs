use std::sync::Arc;

use offline_core::CacheId;

use crate::{BackendResult, CacheHandle};

/// Factory of named cache handles.
///
/// Calling [`get_or_create`](CacheStore::get_or_create) twice with the same
/// name must return handles over the same underlying entries.
pub trait CacheStore: Send + Sync {
    /// Return the handle named `name`, creating it on first use.
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>>;

    /// Return the handle named `name` if it was created before.
    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>>;

    /// Returns the name of this store, used in logs.
    fn name(&self) -> &str {
        "store"
    }
}

impl<T> CacheStore for Arc<T>
where
    T: CacheStore + ?Sized,
{
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>> {
        (**self).get_or_create(name)
    }

    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>> {
        (**self).get(name)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
