#![warn(missing_docs)]
//! # offline-core
//!
//! Core types and collaborator traits for the offline request mediator.
//!
//! This crate defines the narrow contracts the mediator consumes from its
//! environment, so the decision engine and the replay queue never depend on a
//! concrete HTTP client, cache or network monitor:
//!
//! - **Replay** queued requests through the host client ([`Transport`])
//! - **Observe** network reachability ([`Reachability`])
//! - **Publish** replay outcomes ([`NotificationSink`])
//!
//! It also holds the record stored in the replay queue ([`PendingRequest`])
//! and the cache value/identifier types shared with the store backends.

pub mod id;
pub mod notification;
pub mod reachability;
pub mod request;
pub mod transport;
pub mod value;

pub use id::CacheId;
pub use notification::{ERROR_EVENT, Notification, NotificationSink, SUCCESS_EVENT};
pub use reachability::{Connectivity, Reachability};
pub use request::{OfflineFlag, PendingRequest};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use transport::Transport;
pub use value::CacheValue;

/// Raw byte data type used for stored cache values.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
