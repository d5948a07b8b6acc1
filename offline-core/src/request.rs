//! Pending request record and the per-request offline flag.
//!
//! A [`PendingRequest`] is the unit stored in the replay queue. It carries
//! everything the transport needs to replay the request later: target URL,
//! body, headers, method, the original offline flag and the timeout.
//!
//! The record serializes to `{url, data, headers, method, offline, timeout}`:
//!
//! ```
//! use offline_core::{OfflineFlag, PendingRequest};
//! use http::Method;
//!
//! let record = PendingRequest::new(Method::POST, "/items")
//!     .with_header("content-type", "application/json")
//!     .with_data(&b"{\"name\":\"x\"}"[..])
//!     .with_offline(OfflineFlag::Offline);
//!
//! assert_eq!(record.method(), &Method::POST);
//! assert_eq!(record.url(), "/items");
//! ```

use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};

/// Per-request offline override.
///
/// Serialized as an optional boolean: `false`, `true`, or absent/`null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum OfflineFlag {
    /// `offline: false`: never handled offline, always passed through.
    Online,
    /// `offline: true`: handled offline regardless of the global default.
    Offline,
    /// Not set: defers to the global `always_offline` flag.
    #[default]
    Unset,
}

impl OfflineFlag {
    /// Whether the request opted in or defers to `always_offline`.
    ///
    /// `Online` is never eligible, `Offline` always is, `Unset` follows the
    /// global flag.
    pub fn is_eligible(self, always_offline: bool) -> bool {
        match self {
            OfflineFlag::Online => false,
            OfflineFlag::Offline => true,
            OfflineFlag::Unset => always_offline,
        }
    }
}

impl From<Option<bool>> for OfflineFlag {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(false) => OfflineFlag::Online,
            Some(true) => OfflineFlag::Offline,
            None => OfflineFlag::Unset,
        }
    }
}

impl From<OfflineFlag> for Option<bool> {
    fn from(value: OfflineFlag) -> Self {
        match value {
            OfflineFlag::Online => Some(false),
            OfflineFlag::Offline => Some(true),
            OfflineFlag::Unset => None,
        }
    }
}

impl From<bool> for OfflineFlag {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

/// A deferred mutating request waiting in the replay queue.
///
/// Records are immutable once queued: the builder methods consume `self` and
/// are used only while the record is being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    url: String,
    #[serde(default)]
    data: Option<Bytes>,
    #[serde(default, with = "http_serde::header_map")]
    headers: HeaderMap,
    #[serde(with = "http_serde::method")]
    method: Method,
    #[serde(default)]
    offline: OfflineFlag,
    #[serde(default, with = "timeout_millis")]
    timeout: Option<Duration>,
}

impl PendingRequest {
    /// Creates a record with no body, headers or timeout.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        PendingRequest {
            url: url.into(),
            data: None,
            headers: HeaderMap::new(),
            method,
            offline: OfflineFlag::Unset,
            timeout: None,
        }
    }

    /// Sets the body payload.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Replaces the header map.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends one header, skipping names or values that are not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the offline flag the request was issued with.
    pub fn with_offline(mut self, offline: OfflineFlag) -> Self {
        self.offline = offline;
        self
    }

    /// Sets the timeout forwarded to the transport on replay.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Body payload, if any.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Offline flag the request was issued with.
    pub fn offline(&self) -> OfflineFlag {
        self.offline
    }

    /// Timeout interpreted by the transport.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Timeout persisted as whole milliseconds, `null` when unset.
mod timeout_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match timeout {
            Some(timeout) => {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                serializer.serialize_some(&millis)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
