//! Same-candidate retry for transport failures.
//!
//! Separate from candidate fallback: a retry re-sends the *same* idempotent
//! request after a network error or timeout. HTTP statuses and payload
//! problems are never retried here; the resolver moves on instead.

use std::time::Duration;

use studymate_settings::RetrySettings;
use tracing::debug;

use crate::candidate::Candidate;
use crate::errors::TransportError;
use crate::transport::{Transport, TransportResponse};

/// Backoff parameters for [`send_with_retry`].
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Maximum retries per candidate; `0` disables retrying.
    pub max_retries: u32,
    /// Base delay in milliseconds.
    pub base_delay_ms: u64,
    /// Delay cap in milliseconds.
    pub max_delay_ms: u64,
    /// Jitter range (0.0–1.0).
    pub jitter_factor: f64,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::from(&RetrySettings::default())
        }
    }

    /// Delay before retry number `attempt` (zero-based), with random jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(backoff_delay_ms(
            attempt,
            self.base_delay_ms,
            self.max_delay_ms,
            self.jitter_factor,
            rand::random::<f64>(),
        ))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay_ms: settings.base_delay_ms,
            max_delay_ms: settings.max_delay_ms,
            jitter_factor: settings.jitter_factor,
        }
    }
}

/// Exponential backoff with symmetric jitter.
///
/// `min(max_delay, base_delay * 2^attempt) * (1 + (random * 2 - 1) * jitter)`,
/// where `random` is in `[0.0, 1.0)`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn backoff_delay_ms(
    attempt: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
    random: f64,
) -> u64 {
    let exponential = base_delay_ms.saturating_mul(1u64 << attempt.min(31));
    let capped = exponential.min(max_delay_ms);
    let jitter = 1.0 + (random * 2.0 - 1.0) * jitter_factor;
    ((capped as f64) * jitter).round().max(0.0) as u64
}

/// Send a candidate, retrying transport failures of idempotent requests.
pub async fn send_with_retry(
    transport: &dyn Transport,
    candidate: &Candidate,
    policy: &RetryPolicy,
) -> Result<TransportResponse, TransportError> {
    let mut attempt = 0u32;
    loop {
        match transport.send(candidate).await {
            Err(error) if candidate.method.is_idempotent() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                debug!(
                    url = %candidate.url,
                    %error,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
