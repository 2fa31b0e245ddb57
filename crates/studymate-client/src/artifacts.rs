//! Generated artifact downloads (session summary, audio lesson, video lesson).
//!
//! Each artifact is a single `GET` with no fallback. The server names the
//! file through `Content-Disposition`; when it does not, a per-kind default
//! is used.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::errors::ClientError;
use crate::transport::TransportResponse;

static EXTENDED_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"filename\*=([^;]+)").unwrap());
static CHARSET_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^utf-8''").unwrap());
static QUOTED_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="([^"]+)""#).unwrap());
static BARE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"filename=([^;]+)").unwrap());

/// Kind of generated artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// PDF summary of a session.
    SessionSummary,
    /// Narrated audio lesson.
    AudioLesson,
    /// Video overview.
    VideoLesson,
}

impl ArtifactKind {
    /// Endpoint path, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::SessionSummary => "/generateSessionSummary",
            Self::AudioLesson => "/generateAudioLesson",
            Self::VideoLesson => "/generateVideoLesson",
        }
    }

    /// Full request URL for `session_id`.
    pub fn url(self, base_url: &str, session_id: i64) -> String {
        format!("{base_url}{}?session_id={session_id}", self.path())
    }

    /// File name used when the server does not send one.
    pub fn default_filename(self, session_id: i64) -> String {
        match self {
            Self::SessionSummary => format!("session_summary_{session_id}.pdf"),
            Self::AudioLesson => format!("audio-lesson-{session_id}.mp3"),
            Self::VideoLesson => format!("studymate_video_overview_{session_id}.mp4"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SessionSummary => "session summary",
            Self::AudioLesson => "audio lesson",
            Self::VideoLesson => "video lesson",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A downloaded artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// File name to save under.
    pub filename: String,
    /// `Content-Type` reported by the server.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Bytes,
}

/// File name from a `Content-Disposition` header value.
///
/// `filename*=` wins (charset prefix and wrapping quotes stripped, then
/// percent-decoded), then `filename="..."`, then a bare `filename=`.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(caps) = EXTENDED_FILENAME.captures(header) {
        let unprefixed = CHARSET_PREFIX.replace(caps[1].trim(), "");
        let raw = strip_quotes(&unprefixed);
        let decoded = percent_decode_str(raw)
            .decode_utf8()
            .map_or_else(|_| raw.to_string(), |name| name.into_owned());
        return Some(decoded).filter(|name| !name.is_empty());
    }
    if let Some(caps) = QUOTED_FILENAME.captures(header) {
        return Some(caps[1].to_string());
    }
    BARE_FILENAME
        .captures(header)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// Reduce a server-supplied name to a bare file name.
///
/// Only the last path component survives. Names that are empty, `.`, `..`,
/// or still hold a separator or NUL are rejected.
pub fn safe_filename(name: &str) -> Option<String> {
    let base = Path::new(name.trim()).file_name()?.to_str()?.trim();
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '\0');
    if base.is_empty() || base == "." || base == ".." || base.contains(unsafe_char) {
        return None;
    }
    Some(base.to_string())
}

/// Turn an artifact response into an [`Artifact`] or an error.
///
/// A failed response reports the artifact kind, the status and the body
/// text. A server-supplied file name is reduced with [`safe_filename`]; when
/// nothing usable is left the per-kind default is used.
pub fn artifact_from_response(
    kind: ArtifactKind,
    session_id: i64,
    response: TransportResponse,
) -> Result<Artifact, ClientError> {
    if !response.is_success() {
        let text = response.text();
        let text = text.trim();
        let message = if text.is_empty() {
            format!("Failed to generate {kind} (HTTP {})", response.status)
        } else {
            format!("Failed to generate {kind}: {} - {text}", response.status)
        };
        return Err(ClientError::Http {
            status: response.status,
            message,
        });
    }

    let filename = response
        .content_disposition
        .as_deref()
        .and_then(parse_content_disposition)
        .and_then(|name| safe_filename(&name))
        .unwrap_or_else(|| kind.default_filename(session_id));
    Ok(Artifact {
        filename,
        content_type: response.content_type,
        bytes: response.body,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
