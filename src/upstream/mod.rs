//! Upstream HTTP forwarding.
//!
//! # Responsibilities
//! - Issue one HTTP POST per decoded frame to the configured endpoint
//! - Send the payload as the entire request body with the CMP content type
//! - Materialize the full response body before returning
//!
//! A failed POST is not retried: the bridge cannot know whether the
//! upstream already acted on the request, so the error is surfaced to the
//! relay worker and the session ends.

use bytes::Bytes;
use http::{header, Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

/// Content type mandated by the CMP HTTP transport.
pub const CMP_CONTENT_TYPE: &str = "application/pkixcmp";

/// Errors from the outbound POST. All of them are fatal for the session.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Building the outbound request failed.
    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] http::Error),

    /// The POST itself failed (refused, reset, protocol error).
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    /// The response body could not be read to completion.
    #[error("failed to read upstream response body: {0}")]
    Body(#[from] hyper::Error),
}

/// Forwards frame payloads to the fixed upstream endpoint.
///
/// One forwarder is created per relay worker and reused for every frame on
/// that connection; the underlying client (and any pooled upstream
/// connections it holds) is released when the worker terminates.
pub struct Forwarder {
    client: Client<HttpConnector, Full<Bytes>>,
    uri: Uri,
}

impl Forwarder {
    /// Create a forwarder targeting `uri`.
    pub fn new(uri: Uri) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, uri }
    }

    /// POST `payload` to the upstream and return the full response body.
    ///
    /// The response status and headers are not inspected; whatever body the
    /// upstream returns is relayed back to the TCP peer.
    pub async fn forward(&self, payload: Vec<u8>) -> Result<Bytes, UpstreamError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.uri.clone())
            .header(header::CONTENT_TYPE, CMP_CONTENT_TYPE)
            .body(Full::new(Bytes::from(payload)))?;

        let response = self.client.request(request).await?;
        let body = response.into_body().collect().await?.to_bytes();
        Ok(body)
    }

    /// The endpoint this forwarder posts to.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}
