//! Cached value type with expiration metadata.
//!
//! [`CacheValue`] wraps stored data with an optional expiry timestamp. Cache
//! maintenance reads the expiry through `CacheInfo::is_expired` to decide
//! whether an entry must be evicted while the network is reachable.
//!
//! ```
//! use offline_core::CacheValue;
//! use chrono::Utc;
//!
//! let value = CacheValue::new("cached data", Some(Utc::now() + chrono::Duration::hours(1)));
//! assert!(!value.is_expired());
//! ```

use chrono::{DateTime, Utc};
use std::mem::size_of;
use std::time::Duration;

use crate::Raw;

/// A cached value with expiration metadata.
///
/// # Type Parameter
///
/// * `T` - The cached data type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue<T> {
    data: T,
    expire: Option<DateTime<Utc>>,
}

impl<T> CacheValue<T> {
    /// Creates a new cache value with the given data and expiry.
    pub fn new(data: T, expire: Option<DateTime<Utc>>) -> Self {
        CacheValue { data, expire }
    }

    /// Creates a value that never expires.
    pub fn permanent(data: T) -> Self {
        CacheValue { data, expire: None }
    }

    /// Creates a value expiring `ttl` from now.
    pub fn with_ttl(data: T, ttl: Duration) -> Self {
        let expire = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
        CacheValue { data, expire }
    }

    /// Returns a reference to the cached data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns when the data expires.
    #[inline]
    pub fn expire(&self) -> Option<DateTime<Utc>> {
        self.expire
    }

    /// Consumes the cache value and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Whether the expiry timestamp has passed.
    ///
    /// Values without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expire.is_some_and(|expire| expire <= Utc::now())
    }

    /// Remaining time-to-live.
    ///
    /// Returns `None` when there is no expiry or it already passed.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire.and_then(|expire| {
            let duration = expire.signed_duration_since(Utc::now());
            if duration.num_milliseconds() > 0 {
                Some(Duration::from_millis(duration.num_milliseconds() as u64))
            } else {
                None
            }
        })
    }
}

impl CacheValue<Raw> {
    /// Returns the estimated memory usage of this cache value in bytes.
    pub fn memory_size(&self) -> usize {
        size_of::<Self>() + self.data.len()
    }
}
