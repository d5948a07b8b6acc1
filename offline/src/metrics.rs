//! Metrics declaration and recording helpers.
//!
//! With the `metrics` feature enabled the mediator records:
//!
//! - `offline_requests_queued_total` - requests stored for replay
//! - `offline_replay_total` - replayed requests, labelled `result=success|error`
//! - `offline_cache_evictions_total` - entries evicted by online maintenance
//! - `offline_drain_cycles_total` - drain cycles, labelled with their outcome
//!
//! Without the feature every helper is a no-op.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of requests stored in the replay queue.
    pub static ref REQUESTS_QUEUED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offline_requests_queued_total",
            "Total number of requests stored for replay."
        );
        "offline_requests_queued_total"
    };
    /// Track number of replayed requests.
    pub static ref REPLAY_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offline_replay_total",
            "Total number of replayed requests."
        );
        "offline_replay_total"
    };
    /// Track number of cache entries evicted by online maintenance.
    pub static ref CACHE_EVICTION_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offline_cache_evictions_total",
            "Total number of cache entries evicted on the online GET path."
        );
        "offline_cache_evictions_total"
    };
    /// Track number of drain cycles.
    pub static ref DRAIN_CYCLE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offline_drain_cycles_total",
            "Total number of drain cycles."
        );
        "offline_drain_cycles_total"
    };
}

/// Record one request stored for replay.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_queued() {
    metrics::counter!(*REQUESTS_QUEUED_COUNTER).increment(1);
}

/// Record one request stored for replay (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_queued() {}

/// Record one replayed request.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_replay(success: bool) {
    let result = if success { "success" } else { "error" };
    metrics::counter!(*REPLAY_COUNTER, "result" => result).increment(1);
}

/// Record one replayed request (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_replay(_success: bool) {}

/// Record one eviction from cache `cache`.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_eviction(cache: &str) {
    metrics::counter!(*CACHE_EVICTION_COUNTER, "cache" => cache.to_string()).increment(1);
}

/// Record one eviction (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_eviction(_cache: &str) {}

/// Record one finished drain cycle.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_drain(outcome: &'static str) {
    metrics::counter!(*DRAIN_CYCLE_COUNTER, "outcome" => outcome).increment(1);
}

/// Record one finished drain cycle (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_drain(_outcome: &'static str) {}
