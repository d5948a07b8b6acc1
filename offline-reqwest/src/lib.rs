#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod concurrency;
mod error;
mod middleware;
mod options;
mod response;
mod transport;

pub use error::{ReplayError, is_request_queued};
pub use middleware::{CACHE_STATUS_HEADER, OfflineMiddleware};
pub use options::OfflineOptions;
pub use response::CachedResponse;
pub use transport::{ReplayResponse, ReqwestTransport};

// Re-export common types
pub use offline::{
    BroadcastSink, CacheSelector, ManualReachability, Offline, OfflineConfig, OfflineError,
    OfflineHandle, TracingSink,
};
pub use offline_core::OfflineFlag;
