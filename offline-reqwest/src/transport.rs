//! Replay of queued requests through a reqwest client.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use offline_core::{PendingRequest, Transport};
use reqwest_middleware::ClientWithMiddleware;

use crate::error::ReplayError;
use crate::options::OfflineOptions;

/// Successful replay.
#[derive(Debug, Clone)]
pub struct ReplayResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

/// [`Transport`] replaying queued records through a client built with
/// [`OfflineMiddleware`](crate::OfflineMiddleware).
///
/// Each record is sent with the offline flag it was queued with, so a replay
/// attempted after the network went away again is queued once more and the
/// drain cycle stops.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ClientWithMiddleware,
}

impl ReqwestTransport {
    /// Replays through `client`, which should carry the offline middleware.
    pub fn new(client: ClientWithMiddleware) -> Self {
        ReqwestTransport { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = ReplayResponse;
    type Error = ReplayError;

    async fn dispatch(&self, request: &PendingRequest) -> Result<ReplayResponse, ReplayError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.headers().clone())
            .with_extension(OfflineOptions::new(request.offline()));
        if let Some(data) = request.data() {
            builder = builder.body(data.clone());
        }
        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(reqwest_middleware::Error::from)?;
        if !status.is_success() {
            return Err(ReplayError::Status { status, body });
        }
        Ok(ReplayResponse {
            status,
            headers,
            body,
        })
    }

    fn is_requeued(&self, error: &ReplayError) -> bool {
        error.is_request_queued()
    }
}
