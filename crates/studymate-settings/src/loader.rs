//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`StudymateSettings::default()`]
//! 2. If `~/.studymate/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `STUDYMATE_*` environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use studymate_core::LogLevel;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::StudymateSettings;

/// Overrides `api.baseUrl`.
pub const ENV_API_BASE_URL: &str = "STUDYMATE_API_BASE_URL";
/// Overrides `api.requestTimeoutMs` (1 ms to 10 minutes).
pub const ENV_REQUEST_TIMEOUT_MS: &str = "STUDYMATE_REQUEST_TIMEOUT_MS";
/// Overrides `retry.maxRetries` (0 to 10).
pub const ENV_MAX_RETRIES: &str = "STUDYMATE_MAX_RETRIES";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "STUDYMATE_LOG_LEVEL";

/// Resolve the path to the settings file (`~/.studymate/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".studymate").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<StudymateSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults (plus overrides). Invalid
/// JSON or a value that fails validation is an error.
pub fn load_settings_from_path(path: &Path) -> Result<StudymateSettings> {
    let defaults = serde_json::to_value(StudymateSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: StudymateSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning and the file/default value
/// stays in effect.
pub fn apply_env_overrides(settings: &mut StudymateSettings) {
    if let Some(v) = read_env_string(ENV_API_BASE_URL) {
        settings.api.base_url = v;
    }
    if let Some(v) = read_env_u64(ENV_REQUEST_TIMEOUT_MS, 1, 600_000) {
        settings.api.request_timeout_ms = v;
    }
    if let Some(v) = read_env_u32(ENV_MAX_RETRIES, 0, 10) {
        settings.retry.max_retries = v;
    }
    if let Some(v) = read_env_log_level(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse an exact log level name (case-insensitive).
///
/// Unlike [`LogLevel::from_str_lossy`], unknown names are rejected.
pub fn parse_log_level(val: &str) -> Option<LogLevel> {
    serde_json::from_value(Value::String(val.trim().to_lowercase())).ok()
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_env_log_level(name: &str) -> Option<LogLevel> {
    let val = std::env::var(name).ok()?;
    let result = parse_log_level(&val);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid log level env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
