//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! settings file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use studymate_core::LogLevel;

use crate::errors::{Result, SettingsError};

/// Root settings type for the StudyMate client.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://studymate.example.com" },
///   "retry": { "maxRetries": 2 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudymateSettings {
    /// Backend connection.
    pub api: ApiSettings,
    /// Same-candidate retry for transport failures.
    pub retry: RetrySettings,
    /// Flashcard caps.
    pub flashcards: FlashcardSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl StudymateSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "api.baseUrl must not be empty".to_string(),
            ));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "api.requestTimeoutMs must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(SettingsError::InvalidValue(format!(
                "retry.jitterFactor must be within 0..=1, got {}",
                self.retry.jitter_factor
            )));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(SettingsError::InvalidValue(format!(
                "retry.baseDelayMs ({}) exceeds retry.maxDelayMs ({})",
                self.retry.base_delay_ms, self.retry.max_delay_ms
            )));
        }
        Ok(())
    }

    /// Base URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

/// Backend connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Backend base URL; candidate paths are appended to it.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
            user_agent: format!("studymate-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Retry of a single candidate after a transport failure.
///
/// Only idempotent (GET) candidates are retried. With `max_retries = 0` a
/// failed candidate moves straight on to the next one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    /// Maximum number of retry attempts per candidate.
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Jitter factor (0.0–1.0) applied to retry delays.
    pub jitter_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 500,
            max_delay_ms: 5_000,
            jitter_factor: 0.2,
        }
    }
}

/// Flashcard result policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashcardSettings {
    /// Maximum number of cards returned to the caller.
    pub max_cards: usize,
    /// Length of the raw-reply preview in the "no flashcards" error.
    pub preview_chars: usize,
}

impl Default for FlashcardSettings {
    fn default() -> Self {
        Self {
            max_cards: studymate_core::MAX_FLASHCARDS,
            preview_chars: studymate_core::PREVIEW_CHARS,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr. `RUST_LOG` takes precedence.
    pub level: LogLevel,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
