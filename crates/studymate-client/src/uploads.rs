//! Document uploads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;
use crate::transport::TransportResponse;

/// Multipart form field the backend reads the file from.
pub const UPLOAD_FIELD: &str = "file";

/// Arguments for [`StudymateClient::upload_document`](crate::StudymateClient::upload_document).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadDocumentArgs {
    /// File name reported to the server.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
    /// Owner of the upload.
    pub user_id: i64,
    /// Existing session to attach the document to. When absent the backend
    /// creates a session.
    pub session_id: Option<i64>,
}

impl UploadDocumentArgs {
    /// New arguments for a file not yet attached to a session.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>, user_id: i64) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            user_id,
            session_id: None,
        }
    }

    /// Attach the upload to an existing session.
    #[must_use]
    pub fn in_session(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Backend reply to a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDocumentResult {
    /// Human-readable status message.
    pub message: String,
    /// Id of the stored document.
    pub document_id: i64,
    /// Session the document was attached to.
    pub session_id: i64,
    /// Name of that session.
    pub session_name: String,
}

/// Decode an upload response.
///
/// Failures carry the JSON `detail` string when the server sends one.
pub fn upload_result_from_response(
    response: &TransportResponse,
) -> Result<UploadDocumentResult, ClientError> {
    if !response.is_success() {
        let message = serde_json::from_slice::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Upload failed with status {}.", response.status));
        return Err(ClientError::Http {
            status: response.status,
            message,
        });
    }
    serde_json::from_slice(&response.body).map_err(|error| ClientError::Decode(error.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
