//! Stored form of a cached response.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use offline_backend::BackendError;
use offline_core::Raw;
use serde::{Deserialize, Serialize};

use crate::middleware::CACHE_STATUS_HEADER;

/// Response kept in the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl CachedResponse {
    /// Buffered response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        CachedResponse {
            status,
            headers,
            body,
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers, as received from the server.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Encodes the response for storage.
    pub fn encode(&self) -> Result<Raw, BackendError> {
        serde_json::to_vec(self)
            .map(Raw::from)
            .map_err(BackendError::format)
    }

    /// Decodes a stored response.
    pub fn decode(raw: &[u8]) -> Result<Self, BackendError> {
        serde_json::from_slice(raw).map_err(BackendError::format)
    }

    /// Rebuilds a `reqwest::Response` carrying `cache_status` in
    /// [`CACHE_STATUS_HEADER`].
    pub fn into_response(self, cache_status: HeaderValue) -> reqwest::Response {
        let mut response = http::Response::new(reqwest::Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response.headers_mut().insert(CACHE_STATUS_HEADER, cache_status);
        response.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_layout() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let response = CachedResponse::new(StatusCode::CREATED, headers, Bytes::from_static(b"{}"));

        let raw = response.encode().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["status"], 201);
        assert_eq!(json["headers"]["content-type"], "application/json");

        let decoded = CachedResponse::decode(&raw).unwrap();
        assert_eq!(decoded.status(), StatusCode::CREATED);
        assert_eq!(decoded.body().as_ref(), b"{}");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(CachedResponse::decode(b"not json").is_err());
    }
}
