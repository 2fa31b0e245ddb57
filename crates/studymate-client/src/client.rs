//! The StudyMate backend client.
//!
//! Every list or record operation goes through the [`EndpointResolver`]
//! with its literal candidate table from [`crate::routes`]; the normalizers
//! from `studymate-core` double as the resolver's shape checks. Documents,
//! artifacts and uploads hit a single endpoint each.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use studymate_core::constants::FLASHCARD_LIST_KEYS;
use studymate_core::flashcards::{cap_flashcards, preview};
use studymate_core::normalize::{
    DocumentLookup, collect_session_histories, extract_answer, extract_entries,
    normalize_document_rows, normalize_messages, normalize_session, normalize_sessions,
    sort_messages_by_timestamp,
};
use studymate_core::{
    ChatMessage, Flashcard, MAX_FLASHCARDS, PREVIEW_CHARS, SessionChatHistory, SessionDocument,
    SessionSummary, normalize_flashcards_from_unknown, parse_flashcards_response,
};
use studymate_settings::StudymateSettings;
use tracing::{debug, info, warn};

use crate::artifacts::{Artifact, ArtifactKind, artifact_from_response};
use crate::candidate::{Candidate, Operation};
use crate::errors::{ClientError, Result};
use crate::resolver::EndpointResolver;
use crate::retry::{RetryPolicy, send_with_retry};
use crate::routes;
use crate::transport::{FilePart, HttpTransport, Transport};
use crate::uploads::{
    UPLOAD_FIELD, UploadDocumentArgs, UploadDocumentResult, upload_result_from_response,
};

/// Arguments for [`StudymateClient::create_session`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateSessionArgs {
    /// Owner of the new session.
    pub user_id: i64,
    /// Optional display name. Blank names are not sent.
    pub name: Option<String>,
}

/// Async client for the StudyMate backend.
#[derive(Clone)]
pub struct StudymateClient {
    base_url: String,
    resolver: EndpointResolver,
    retry: RetryPolicy,
    max_flashcards: usize,
    preview_chars: usize,
}

impl StudymateClient {
    /// Client configured from settings, using the `reqwest` transport.
    pub fn new(settings: &StudymateSettings) -> Self {
        let transport = Arc::new(HttpTransport::new(
            settings.api.request_timeout_ms,
            &settings.api.user_agent,
        ));
        Self::with_transport(settings.base_url(), transport)
            .with_retry(RetryPolicy::from(&settings.retry))
            .with_flashcard_limits(
                settings.flashcards.max_cards,
                settings.flashcards.preview_chars,
            )
    }

    /// Client over an arbitrary transport, with default limits and no retries.
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resolver: EndpointResolver::new(transport),
            retry: RetryPolicy::disabled(),
            max_flashcards: MAX_FLASHCARDS,
            preview_chars: PREVIEW_CHARS,
        }
    }

    /// Retry transport failures of `GET` requests.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.resolver = self.resolver.with_retry(retry.clone());
        self.retry = retry;
        self
    }

    /// Cap on returned flashcards and length of the no-cards reply preview.
    #[must_use]
    pub fn with_flashcard_limits(mut self, max_cards: usize, preview_chars: usize) -> Self {
        self.max_flashcards = max_cards;
        self.preview_chars = preview_chars;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(&self) -> &dyn Transport {
        self.resolver.transport().as_ref()
    }

    // ─── Chat ───

    /// Chat history of a session, ordered by timestamp where timestamps parse.
    pub async fn fetch_chat_history(&self, session_id: i64) -> Result<Vec<ChatMessage>> {
        let mut messages = self
            .resolver
            .resolve(
                Operation::ChatHistory,
                &routes::chat_history(&self.base_url, session_id),
                |payload| extract_entries(payload).map(normalize_messages),
            )
            .await?;
        sort_messages_by_timestamp(&mut messages);
        Ok(messages)
    }

    /// Chat histories of every session of a user, keyed by session id.
    pub async fn fetch_chat_histories_for_user(
        &self,
        user_id: i64,
    ) -> Result<BTreeMap<i64, SessionChatHistory>> {
        let mut histories = self
            .resolver
            .resolve(
                Operation::ChatHistoriesForUser,
                &routes::chat_histories_for_user(&self.base_url, user_id),
                collect_session_histories,
            )
            .await?;
        for history in histories.values_mut() {
            sort_messages_by_timestamp(&mut history.messages);
        }
        Ok(histories)
    }

    /// Ask the assistant a question and return its raw reply text.
    pub async fn ask_question(&self, session_id: i64, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Question text is required.".to_string(),
            ));
        }
        let answer = self
            .resolver
            .resolve(
                Operation::AskQuestion,
                &routes::ask_question(&self.base_url, session_id, question),
                extract_answer,
            )
            .await?;
        Ok(answer)
    }

    // ─── Sessions ───

    /// Sessions of a user.
    ///
    /// Legacy tuple payloads trigger one document lookup per session.
    pub async fn fetch_sessions(&self, user_id: i64) -> Result<Vec<SessionSummary>> {
        let lookup: &dyn DocumentLookup = self;
        let sessions = self
            .resolver
            .resolve_with(
                Operation::Sessions,
                &routes::sessions(&self.base_url, user_id),
                move |payload| async move { normalize_sessions(&payload, lookup).await },
            )
            .await?;
        Ok(sessions)
    }

    /// Create a session and return it as the server reports it.
    pub async fn create_session(&self, args: CreateSessionArgs) -> Result<SessionSummary> {
        let session = self
            .resolver
            .resolve(
                Operation::CreateSession,
                &routes::create_session(&self.base_url, args.user_id, args.name.as_deref()),
                normalize_session,
            )
            .await?;
        info!(session_id = session.id, "session created");
        Ok(session)
    }

    /// Documents attached to a session.
    ///
    /// Never fails: any problem is logged and yields an empty list.
    pub async fn fetch_documents(&self, session_id: i64) -> Vec<SessionDocument> {
        let candidate = Candidate::get(routes::documents(&self.base_url, session_id));
        let response = match send_with_retry(self.transport(), &candidate, &self.retry).await {
            Ok(response) => response,
            Err(error) => {
                warn!(session_id, %error, "failed to fetch documents");
                return Vec::new();
            }
        };
        if !response.is_success() {
            warn!(session_id, status = response.status, "failed to fetch documents");
            return Vec::new();
        }
        match serde_json::from_slice::<Value>(&response.body) {
            Ok(payload) => normalize_document_rows(&payload),
            Err(error) => {
                warn!(session_id, %error, "document list is not JSON");
                Vec::new()
            }
        }
    }

    // ─── Flashcards ───

    /// Flashcards generated by the backend for a session, capped.
    pub async fn fetch_flashcards(&self, session_id: i64) -> Result<Vec<Flashcard>> {
        let cards = self
            .resolver
            .resolve(
                Operation::Flashcards,
                &routes::flashcards(&self.base_url, session_id),
                flashcards_from_payload,
            )
            .await?;
        Ok(cap_flashcards(cards, self.max_flashcards))
    }

    /// Ask the assistant for `count` flashcards and mine them from its reply.
    ///
    /// Fails with [`ClientError::NoFlashcards`] when the reply holds none.
    pub async fn generate_flashcards_via_chat(
        &self,
        session_id: i64,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        if count == 0 {
            return Err(ClientError::InvalidInput(
                "Flashcard count must be at least 1.".to_string(),
            ));
        }
        let reply = self
            .ask_question(session_id, &format!("Create {count} flashcards"))
            .await?;
        let cards = parse_flashcards_response(&reply);
        if cards.is_empty() {
            return Err(ClientError::NoFlashcards {
                preview: preview(&reply, self.preview_chars),
            });
        }
        debug!(session_id, mined = cards.len(), "flashcards mined from reply");
        Ok(cap_flashcards(cards, self.max_flashcards))
    }

    // ─── Artifacts ───

    /// PDF summary of a session.
    pub async fn download_session_summary(&self, session_id: i64) -> Result<Artifact> {
        self.download(ArtifactKind::SessionSummary, session_id).await
    }

    /// Audio lesson of a session.
    pub async fn download_audio_lesson(&self, session_id: i64) -> Result<Artifact> {
        self.download(ArtifactKind::AudioLesson, session_id).await
    }

    /// Video overview of a session.
    pub async fn download_video_lesson(&self, session_id: i64) -> Result<Artifact> {
        self.download(ArtifactKind::VideoLesson, session_id).await
    }

    async fn download(&self, kind: ArtifactKind, session_id: i64) -> Result<Artifact> {
        let candidate = Candidate::get(kind.url(&self.base_url, session_id));
        let response = send_with_retry(self.transport(), &candidate, &self.retry).await?;
        let artifact = artifact_from_response(kind, session_id, response)?;
        info!(
            %kind,
            session_id,
            filename = %artifact.filename,
            bytes = artifact.bytes.len(),
            "artifact downloaded"
        );
        Ok(artifact)
    }

    // ─── Uploads ───

    /// Upload a document, optionally into an existing session.
    pub async fn upload_document(&self, args: UploadDocumentArgs) -> Result<UploadDocumentResult> {
        let url = routes::upload(&self.base_url, args.user_id, args.session_id);
        let part = FilePart {
            field: UPLOAD_FIELD.to_string(),
            file_name: args.file_name,
            bytes: args.bytes,
        };
        let response = self.transport().send_multipart(&url, part).await?;
        let result = upload_result_from_response(&response)?;
        info!(
            document_id = result.document_id,
            session_id = result.session_id,
            "document uploaded"
        );
        Ok(result)
    }
}

#[async_trait]
impl DocumentLookup for StudymateClient {
    async fn documents_for_session(&self, session_id: i64) -> Vec<SessionDocument> {
        self.fetch_documents(session_id).await
    }
}

/// Shape check for the flashcard endpoints.
///
/// Any recoverable card wins. A list with no valid cards is still a
/// recognized (empty) answer; anything else is the wrong shape.
fn flashcards_from_payload(payload: &Value) -> Option<Vec<Flashcard>> {
    let cards = normalize_flashcards_from_unknown(payload);
    if !cards.is_empty() {
        return Some(cards);
    }
    let is_list = match payload {
        Value::Array(_) => true,
        Value::Object(record) => FLASHCARD_LIST_KEYS
            .iter()
            .any(|key| record.get(*key).is_some_and(Value::is_array)),
        _ => false,
    };
    is_list.then(Vec::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
