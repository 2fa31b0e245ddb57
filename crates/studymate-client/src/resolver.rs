//! Endpoint fallback dispatch.
//!
//! An operation hands the resolver an ordered candidate list and an
//! extractor. Candidates are tried strictly one after another; the first
//! 2xx JSON response the extractor accepts wins and nothing after it is
//! sent. Every rejected candidate leaves one diagnostic line behind, and
//! when all of them are rejected those lines become the error.

use std::future::{Future, ready};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::candidate::{Candidate, Operation};
use crate::errors::{CandidateFailure, ExhaustedError, FailureReason};
use crate::retry::{RetryPolicy, send_with_retry};
use crate::transport::Transport;

/// Tries candidates in order until one yields a usable payload.
#[derive(Clone)]
pub struct EndpointResolver {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl EndpointResolver {
    /// Resolver over `transport` without same-candidate retries.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::disabled(),
        }
    }

    /// Set the retry policy for transport failures of `GET` candidates.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Underlying transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolve with a synchronous extractor.
    ///
    /// `extract` returns `None` to reject a payload as the wrong shape.
    pub async fn resolve<T, F>(
        &self,
        operation: Operation,
        candidates: &[Candidate],
        extract: F,
    ) -> Result<T, ExhaustedError>
    where
        F: Fn(&Value) -> Option<T>,
    {
        self.resolve_with(operation, candidates, |payload| ready(extract(&payload)))
            .await
    }

    /// Resolve with an asynchronous extractor.
    ///
    /// Used where extraction itself performs requests, such as the legacy
    /// session rows that need a document lookup per session.
    pub async fn resolve_with<T, F, Fut>(
        &self,
        operation: Operation,
        candidates: &[Candidate],
        mut extract: F,
    ) -> Result<T, ExhaustedError>
    where
        F: FnMut(Value) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let mut failures = Vec::new();

        for (attempt, candidate) in candidates.iter().enumerate() {
            let reason = match send_with_retry(self.transport.as_ref(), candidate, &self.retry).await
            {
                Err(error) => FailureReason::from(error),
                Ok(response) if !response.is_success() => FailureReason::Status(response.status),
                Ok(response) => match serde_json::from_slice::<Value>(&response.body) {
                    Err(error) => FailureReason::InvalidJson(error.to_string()),
                    Ok(payload) => match extract(payload).await {
                        Some(value) => {
                            debug!(
                                %operation,
                                url = %candidate.url,
                                attempt = attempt + 1,
                                "endpoint resolved"
                            );
                            return Ok(value);
                        }
                        None => FailureReason::UnexpectedShape,
                    },
                },
            };

            debug!(
                %operation,
                method = %candidate.method,
                url = %candidate.url,
                %reason,
                "candidate rejected"
            );
            failures.push(CandidateFailure {
                url: candidate.url.clone(),
                reason,
            });
        }

        warn!(%operation, tried = failures.len(), "all endpoint candidates failed");
        Err(ExhaustedError {
            operation,
            failures,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
