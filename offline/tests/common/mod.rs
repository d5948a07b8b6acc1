//! Shared helpers for the mediator integration tests.
#![allow(dead_code)]

pub mod store;
pub mod transport;

pub use store::{TestHandle, TestStore};
pub use transport::{CollectingSink, RecordingTransport, TestError};

use http::Method;
use offline::{ManualReachability, Offline, OfflineConfig, RequestDescriptor};
use std::sync::Arc;

/// Mediator over a fresh [`TestStore`] and a host-driven reachability source.
pub fn mediator(
    config: OfflineConfig,
    online: bool,
) -> (Offline, Arc<TestStore>, Arc<ManualReachability>) {
    let store = Arc::new(TestStore::new());
    let reachability = Arc::new(ManualReachability::new(online.into()));
    let offline = Offline::new(config, store.clone(), reachability.clone()).unwrap();
    (offline, store, reachability)
}

/// Offline-eligible POST to `url`.
pub fn post(url: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::POST, url).with_offline(true)
}
