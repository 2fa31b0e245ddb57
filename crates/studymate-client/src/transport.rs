//! HTTP transport seam.
//!
//! [`Transport`] is the only thing the resolver and the operations talk to.
//! [`HttpTransport`] is the `reqwest` implementation; tests substitute an
//! in-memory one.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};
use tracing::{trace, warn};

use crate::candidate::{Candidate, HttpMethod};
use crate::errors::TransportError;

/// Raw response: status, the headers the client cares about, and the body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `Content-Disposition` header.
    pub content_disposition: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Response with a status and body and no interesting headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            ..Self::default()
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A file sent as one multipart form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Sends requests. Non-2xx statuses are responses, not errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one candidate request.
    async fn send(&self, candidate: &Candidate) -> Result<TransportResponse, TransportError>;

    /// `POST` a multipart form with a single file field.
    ///
    /// Default implementation reports that uploads are unsupported.
    async fn send_multipart(
        &self,
        url: &str,
        part: FilePart,
    ) -> Result<TransportResponse, TransportError> {
        let _ = part;
        Err(TransportError::Network(format!(
            "multipart upload to {url} is not supported by this transport"
        )))
    }
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout and user agent.
    pub fn new(timeout_ms: u64, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|error| {
                warn!(%error, "failed to build configured HTTP client, using defaults");
                reqwest::Client::default()
            });
        Self { client, timeout_ms }
    }

    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                after_ms: self.timeout_ms,
            }
        } else {
            TransportError::Network(error.to_string())
        }
    }

    async fn read(&self, response: reqwest::Response) -> Result<TransportResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|error| {
            if error.is_timeout() {
                self.map_error(&error)
            } else {
                TransportError::Body(error.to_string())
            }
        })?;
        Ok(TransportResponse {
            status,
            content_type: header_string(&headers, CONTENT_TYPE.as_str()),
            content_disposition: header_string(&headers, CONTENT_DISPOSITION.as_str()),
            body,
        })
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, candidate: &Candidate) -> Result<TransportResponse, TransportError> {
        trace!(method = %candidate.method, url = %candidate.url, "sending request");
        let request = match candidate.method {
            HttpMethod::Get => self.client.get(&candidate.url),
            HttpMethod::Post => self.client.post(&candidate.url),
        };
        let request = match &candidate.body {
            Some(body) => request.json(body),
            None => request,
        };
        let response = request.send().await.map_err(|e| self.map_error(&e))?;
        self.read(response).await
    }

    async fn send_multipart(
        &self,
        url: &str,
        part: FilePart,
    ) -> Result<TransportResponse, TransportError> {
        trace!(url, file_name = %part.file_name, bytes = part.bytes.len(), "uploading file");
        let file = reqwest::multipart::Part::bytes(part.bytes.to_vec()).file_name(part.file_name);
        let form = reqwest::multipart::Form::new().part(part.field, file);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;
        self.read(response).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
