//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events. Binaries call
//! [`init_subscriber`] (human-readable) or [`init_json_subscriber`]
//! (one JSON object per line) once at startup. `RUST_LOG` overrides the
//! configured level in both cases.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Log level accepted by the settings file and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-candidate detail.
    Trace,
    /// Dropped records, resolver attempts.
    Debug,
    /// Operation outcomes.
    Info,
    /// Exhausted operations and soft failures.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Parse a level name (case-insensitive). Unknown names become `Warn`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "error" => Self::Error,
            _ => Self::Warn,
        }
    }

    /// Directive string for an [`EnvFilter`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install a compact stderr subscriber.
///
/// Subsequent calls are no-ops.
pub fn init_subscriber(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Install a JSON-lines stderr subscriber.
///
/// Subsequent calls are no-ops.
pub fn init_json_subscriber(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .json();

    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(LogLevel::from_str_lossy("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_lossy(" info "), LogLevel::Info);
        assert_eq!(LogLevel::from_str_lossy("error"), LogLevel::Error);
    }

    #[test]
    fn unknown_level_is_warn() {
        assert_eq!(LogLevel::from_str_lossy("verbose"), LogLevel::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn display_round_trips() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::from_str_lossy(&level.to_string()), level);
        }
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Warn);
        assert!(LogLevel::Error > LogLevel::Info);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_subscriber(LogLevel::Error);
        init_subscriber(LogLevel::Error);
        init_json_subscriber(LogLevel::Error);
    }
}
