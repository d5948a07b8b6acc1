#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # offline-feoxdb
//!
//! Durable [`CacheStore`](offline_backend::CacheStore) backed by FeOxDB.
//!
//! Pair it with the replay queue when deferred requests must survive a
//! process restart.

mod cache;
mod error;
mod store;

pub use cache::FeOxDbCache;
pub use error::FeOxDbError;
pub use store::{FeOxDbStore, FeOxDbStoreBuilder};
