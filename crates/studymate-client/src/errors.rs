//! Client error types.
//!
//! - [`TransportError`]: one request failed below HTTP (network, timeout, body)
//! - [`CandidateFailure`]: why one candidate was rejected; its `Display` is
//!   the diagnostic line `"<url> → <reason>"`
//! - [`ExhaustedError`]: every candidate of an operation was rejected
//! - [`ClientError`]: what the public operations return

use std::fmt;

use thiserror::Error;

use crate::candidate::Operation;

/// Failure of a single request below the HTTP status level.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, TLS, or protocol failure.
    #[error("{0}")]
    Network(String),
    /// No response within the configured timeout.
    #[error("request timed out after {after_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        after_ms: u64,
    },
    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Why a candidate was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// Non-2xx HTTP status.
    Status(u16),
    /// Transport-level failure.
    Transport(String),
    /// 2xx response whose body is not JSON.
    InvalidJson(String),
    /// 2xx JSON that the extractor did not recognize.
    UnexpectedShape,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Transport(message) | Self::InvalidJson(message) => f.write_str(message),
            Self::UnexpectedShape => f.write_str("Unexpected payload shape"),
        }
    }
}

impl From<TransportError> for FailureReason {
    fn from(error: TransportError) -> Self {
        Self::Transport(error.to_string())
    }
}

/// One rejected candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFailure {
    /// URL of the candidate.
    pub url: String,
    /// Why it was rejected.
    pub reason: FailureReason,
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.url, self.reason)
    }
}

/// Every candidate of an operation failed.
///
/// The message is the operation headline followed by one line per
/// candidate, in the order they were tried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct ExhaustedError {
    /// Operation that failed.
    pub operation: Operation,
    /// Per-candidate failures, in attempt order.
    pub failures: Vec<CandidateFailure>,
}

impl fmt::Display for ExhaustedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = self.operation.headline();
        if self.failures.is_empty() {
            return write!(f, "{headline}.");
        }
        write!(f, "{headline}{}", self.operation.detail_separator())?;
        for failure in &self.failures {
            write!(f, "\n{failure}")?;
        }
        Ok(())
    }
}

/// Errors returned by [`StudymateClient`](crate::StudymateClient) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before any request was made.
    #[error("{0}")]
    InvalidInput(String),

    /// All endpoint candidates failed.
    #[error(transparent)]
    Exhausted(#[from] ExhaustedError),

    /// A single-endpoint request returned a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a generic one.
        message: String,
    },

    /// A single-endpoint request failed below HTTP.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response body did not have the expected structure.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The assistant replied, but no flashcards could be mined from the text.
    #[error("Could not find any flashcards in the assistant's reply. Reply preview: {preview}")]
    NoFlashcards {
        /// Truncated raw reply.
        preview: String,
    },
}

impl ClientError {
    /// HTTP status, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
