//! Moka cache capacity metrics.
//!
//! Enable the `metrics` feature to record them.
//!
//! - `offline_moka_entries` - current number of entries in a cache (gauge)
//! - `offline_moka_size_bytes` - current weighted size of a cache (gauge)
//!
//! Both carry a `cache` label with the cache identifier.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Metric name for the entry count gauge.
    pub static ref MOKA_ENTRIES: &'static str = {
        metrics::describe_gauge!(
            "offline_moka_entries",
            "Current number of entries in the Moka cache."
        );
        "offline_moka_entries"
    };

    /// Metric name for the weighted size gauge.
    pub static ref MOKA_SIZE_BYTES: &'static str = {
        metrics::describe_gauge!(
            "offline_moka_size_bytes",
            "Current weighted size of the Moka cache."
        );
        "offline_moka_size_bytes"
    };
}

/// Record current cache capacity metrics.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_capacity(cache: &str, entries: u64, size: u64) {
    metrics::gauge!(*MOKA_ENTRIES, "cache" => cache.to_string()).set(entries as f64);
    metrics::gauge!(*MOKA_SIZE_BYTES, "cache" => cache.to_string()).set(size as f64);
}

/// Record current cache capacity metrics (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_capacity(_cache: &str, _entries: u64, _size: u64) {}
