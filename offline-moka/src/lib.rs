#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # offline-moka
//!
//! In-memory [`CacheStore`](offline_backend::CacheStore) backed by Moka.
//!
//! ```
//! use offline_moka::MokaStore;
//!
//! let store = MokaStore::builder().max_entries(10_000).build();
//! assert!(store.is_empty());
//! ```

mod builder;
mod cache;
pub mod metrics;
mod store;

pub use builder::{ByteCapacity, EntryCapacity, MokaStoreBuilder, NoCapacity};
pub use cache::MokaCache;
pub use moka::policy::EvictionPolicy;
pub use store::MokaStore;
