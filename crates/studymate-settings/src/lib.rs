//! # studymate-settings
//!
//! Configuration for the StudyMate client, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`StudymateSettings::default()`]
//! 2. **User file**: `~/.studymate/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `STUDYMATE_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

static SETTINGS: OnceLock<StudymateSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.studymate/settings.json` with env
/// var overrides. If loading fails, the compiled defaults are used.
pub fn get_settings() -> &'static StudymateSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to load settings, using defaults");
            StudymateSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: StudymateSettings) -> std::result::Result<(), StudymateSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
