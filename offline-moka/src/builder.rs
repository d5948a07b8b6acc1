//! Builder for configuring [`MokaStore`].

use std::mem::size_of;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use offline_core::{CacheValue, Raw};

use crate::store::MokaStore;

/// Expiration policy that calculates TTL from [`CacheValue::expire`] timestamps.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl Expiry<String, CacheValue<Raw>> for Expiration {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheValue<Raw>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::calculate_ttl(value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheValue<Raw>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // The new value's expiry wins; moka's default keeps the old deadline.
        Self::calculate_ttl(value)
    }
}

impl Expiration {
    fn calculate_ttl(value: &CacheValue<Raw>) -> Option<Duration> {
        value.expire().map(|expiration| {
            let millis = (expiration - Utc::now()).num_milliseconds();
            if millis <= 0 {
                Duration::ZERO
            } else {
                Duration::from_millis(millis as u64)
            }
        })
    }
}

/// Marker type: capacity has not been configured yet.
///
/// Call either [`max_entries()`](MokaStoreBuilder::max_entries) or
/// [`max_bytes()`](MokaStoreBuilder::max_bytes) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: every cache holds at most `n` entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: every cache holds at most `n` bytes (approximate).
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

#[derive(Debug, Clone, Copy)]
pub(crate) enum Capacity {
    Entries(u64),
    Bytes(u64),
}

/// Settings shared by every cache a store creates.
#[derive(Clone)]
pub(crate) struct CacheSettings {
    capacity: Capacity,
    eviction_policy: Option<EvictionPolicy>,
    evict_expired: bool,
}

impl CacheSettings {
    pub(crate) fn entries(max_entries: u64) -> Self {
        CacheSettings {
            capacity: Capacity::Entries(max_entries),
            eviction_policy: None,
            evict_expired: false,
        }
    }

    pub(crate) fn build_cache(&self) -> Cache<String, CacheValue<Raw>> {
        let (max_capacity, default_policy, weighted) = match self.capacity {
            Capacity::Entries(n) => (n, EvictionPolicy::tiny_lfu(), false),
            // TinyLFU admission can reject weighted entries even when eviction
            // would make room, so byte budgets default to plain LRU.
            Capacity::Bytes(n) => (n, EvictionPolicy::lru(), true),
        };
        let policy = self.eviction_policy.clone().unwrap_or(default_policy);

        let mut builder: CacheBuilder<String, CacheValue<Raw>, Cache<String, CacheValue<Raw>>> =
            CacheBuilder::new(max_capacity).eviction_policy(policy);
        if weighted {
            builder = builder.weigher(byte_weigher);
        }
        if self.evict_expired {
            builder = builder.expire_after(Expiration);
        }
        builder.build()
    }
}

/// Approximate byte cost of one entry: key, value and their headers.
fn byte_weigher(key: &String, value: &CacheValue<Raw>) -> u32 {
    (size_of::<String>() + key.len() + value.memory_size()).min(u32::MAX as usize) as u32
}

/// Builder for [`MokaStore`].
///
/// Capacity is tracked in the type so a store cannot be built without one.
///
/// # Examples
///
/// ```
/// use offline_moka::MokaStore;
///
/// let store = MokaStore::builder()
///     .max_entries(1_000)
///     .name("responses")
///     .build();
/// ```
pub struct MokaStoreBuilder<Cap = NoCapacity> {
    capacity: Cap,
    eviction_policy: Option<EvictionPolicy>,
    evict_expired: bool,
    name: String,
}

impl Default for MokaStoreBuilder<NoCapacity> {
    fn default() -> Self {
        MokaStoreBuilder {
            capacity: NoCapacity,
            eviction_policy: None,
            evict_expired: false,
            name: "moka".to_owned(),
        }
    }
}

impl MokaStoreBuilder<NoCapacity> {
    /// Limits every cache to `entries` entries.
    pub fn max_entries(self, entries: u64) -> MokaStoreBuilder<EntryCapacity> {
        MokaStoreBuilder {
            capacity: EntryCapacity(entries),
            eviction_policy: self.eviction_policy,
            evict_expired: self.evict_expired,
            name: self.name,
        }
    }

    /// Limits every cache to roughly `bytes` bytes of keys and values.
    pub fn max_bytes(self, bytes: u64) -> MokaStoreBuilder<ByteCapacity> {
        MokaStoreBuilder {
            capacity: ByteCapacity(bytes),
            eviction_policy: self.eviction_policy,
            evict_expired: self.evict_expired,
            name: self.name,
        }
    }
}

impl<Cap> MokaStoreBuilder<Cap> {
    /// Sets the store name used in logs and metrics.
    ///
    /// # Default
    ///
    /// `"moka"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the eviction policy used when a cache reaches capacity.
    ///
    /// # Default
    ///
    /// - **Entry-based capacity**: [`EvictionPolicy::tiny_lfu()`]
    /// - **Byte-based capacity**: [`EvictionPolicy::lru()`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    /// Lets Moka drop entries once their expiry passes.
    ///
    /// Disabled by default: expired entries stay readable until maintenance
    /// removes them, so they can still be served while offline.
    pub fn evict_expired(mut self, enabled: bool) -> Self {
        self.evict_expired = enabled;
        self
    }

    fn finish(self, capacity: Capacity) -> MokaStore {
        let settings = CacheSettings {
            capacity,
            eviction_policy: self.eviction_policy,
            evict_expired: self.evict_expired,
        };
        MokaStore {
            caches: DashMap::new(),
            settings,
            name: self.name,
        }
    }
}

impl MokaStoreBuilder<EntryCapacity> {
    /// Builds the [`MokaStore`] with entry-count based capacity.
    pub fn build(self) -> MokaStore {
        let capacity = Capacity::Entries(self.capacity.0);
        self.finish(capacity)
    }
}

impl MokaStoreBuilder<ByteCapacity> {
    /// Builds the [`MokaStore`] with byte-based capacity.
    pub fn build(self) -> MokaStore {
        let capacity = Capacity::Bytes(self.capacity.0);
        self.finish(capacity)
    }
}
