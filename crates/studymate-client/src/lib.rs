//! # studymate-client
//!
//! Async client for the StudyMate backend.
//!
//! The backend's routes and response shapes have drifted over time, so each
//! logical operation carries an ordered table of candidate requests
//! ([`routes`]). The [`EndpointResolver`] sends them one at a time and stops
//! at the first 2xx JSON payload the operation's normalizer accepts. When
//! every candidate is rejected, the [`ExhaustedError`] lists one line per
//! attempt.
//!
//! - [`StudymateClient`]: the public operations
//! - [`Transport`]: the HTTP seam; [`HttpTransport`] is the `reqwest` one
//! - [`artifacts`] and [`uploads`]: single-endpoint file transfers

#![deny(unsafe_code)]

pub mod artifacts;
pub mod candidate;
pub mod client;
pub mod errors;
pub mod resolver;
pub mod retry;
pub mod routes;
pub mod transport;
pub mod uploads;

pub use artifacts::{Artifact, ArtifactKind, safe_filename};
pub use candidate::{Candidate, HttpMethod, Operation};
pub use client::{CreateSessionArgs, StudymateClient};
pub use errors::{
    CandidateFailure, ClientError, ExhaustedError, FailureReason, Result, TransportError,
};
pub use resolver::EndpointResolver;
pub use retry::RetryPolicy;
pub use transport::{FilePart, HttpTransport, Transport, TransportResponse};
pub use uploads::{UploadDocumentArgs, UploadDocumentResult};

pub use studymate_core::{normalize_flashcards_from_unknown, parse_flashcards_response};
