//! # studymate
//!
//! Command-line front end for the StudyMate backend. Every subcommand maps
//! onto one client operation and prints its result as pretty JSON; artifact
//! downloads are written to disk.

#![deny(unsafe_code)]

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use studymate_client::{
    Artifact, CreateSessionArgs, StudymateClient, UploadDocumentArgs, safe_filename,
};
use studymate_core::LogLevel;
use studymate_core::logging::{init_json_subscriber, init_subscriber};
use studymate_settings::loader::parse_log_level;
use studymate_settings::{StudymateSettings, load_settings, load_settings_from_path};
use tracing::debug;

/// StudyMate command-line client.
#[derive(Debug, Parser)]
#[command(name = "studymate", version, about = "StudyMate backend client")]
struct Cli {
    /// Backend base URL (overrides settings).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides settings).
    #[arg(long, global = true, value_parser = level_arg)]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Settings file (default: `~/.studymate/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat history of a session.
    History {
        /// Session id.
        session_id: i64,
    },
    /// Chat histories of every session of a user.
    Histories {
        /// User id.
        user_id: i64,
    },
    /// Ask the assistant a question.
    Ask {
        /// Session id.
        session_id: i64,
        /// Question text.
        question: String,
    },
    /// Sessions of a user.
    Sessions {
        /// User id.
        user_id: i64,
    },
    /// Create a session.
    CreateSession {
        /// User id.
        user_id: i64,
        /// Session name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Documents attached to a session.
    Documents {
        /// Session id.
        session_id: i64,
    },
    /// Flashcards generated by the backend.
    Flashcards {
        /// Session id.
        session_id: i64,
    },
    /// Ask the assistant for flashcards and mine them from the reply.
    Quiz {
        /// Session id.
        session_id: i64,
        /// Number of cards to ask for.
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Mine flashcards from text offline (file, or stdin when omitted).
    Mine {
        /// Text file.
        file: Option<PathBuf>,
    },
    /// Download the PDF summary of a session.
    Summary(ArtifactArgs),
    /// Download the audio lesson of a session.
    Audio(ArtifactArgs),
    /// Download the video overview of a session.
    Video(ArtifactArgs),
    /// Upload a document.
    Upload {
        /// File to upload.
        file: PathBuf,
        /// Owner of the upload.
        #[arg(long)]
        user_id: i64,
        /// Existing session to attach the document to.
        #[arg(long)]
        session_id: Option<i64>,
    },
}

#[derive(Debug, clap::Args)]
struct ArtifactArgs {
    /// Session id.
    session_id: i64,
    /// Output file or directory (default: server-provided name in the
    /// current directory).
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn level_arg(value: &str) -> std::result::Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level: {value}"))
}

fn resolve_settings(cli: &Cli) -> Result<StudymateSettings> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => load_settings().context("failed to load settings")?,
    };
    if let Some(base_url) = &cli.base_url {
        settings.api.base_url.clone_from(base_url);
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if cli.log_json {
        settings.logging.json = true;
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Where to save an artifact: the given file, a directory joined with the
/// server-provided name, or that name in the current directory.
///
/// The name never contributes more than one path component.
fn artifact_path(output: Option<&Path>, filename: &str) -> PathBuf {
    let filename = safe_filename(filename).unwrap_or_else(|| "download".to_string());
    match output {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename),
    }
}

fn save_artifact(artifact: &Artifact, output: Option<&Path>) -> Result<()> {
    let path = artifact_path(output, &artifact.filename);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    print_json(&json!({
        "path": path.display().to_string(),
        "contentType": artifact.content_type,
        "bytes": artifact.bytes.len(),
    }))
}

fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            let _ = std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn run(cli: Cli, settings: &StudymateSettings) -> Result<()> {
    let client = StudymateClient::new(settings);
    debug!(base_url = client.base_url(), command = ?cli.command, "running command");

    match cli.command {
        Command::History { session_id } => {
            print_json(&client.fetch_chat_history(session_id).await?)
        }
        Command::Histories { user_id } => {
            print_json(&client.fetch_chat_histories_for_user(user_id).await?)
        }
        Command::Ask {
            session_id,
            question,
        } => print_json(&client.ask_question(session_id, &question).await?),
        Command::Sessions { user_id } => print_json(&client.fetch_sessions(user_id).await?),
        Command::CreateSession { user_id, name } => print_json(
            &client
                .create_session(CreateSessionArgs { user_id, name })
                .await?,
        ),
        Command::Documents { session_id } => {
            print_json(&client.fetch_documents(session_id).await)
        }
        Command::Flashcards { session_id } => {
            print_json(&client.fetch_flashcards(session_id).await?)
        }
        Command::Quiz { session_id, count } => print_json(
            &client
                .generate_flashcards_via_chat(session_id, count)
                .await?,
        ),
        Command::Mine { file } => {
            let text = read_text(file.as_deref())?;
            print_json(&studymate_client::parse_flashcards_response(&text))
        }
        Command::Summary(args) => {
            let artifact = client.download_session_summary(args.session_id).await?;
            save_artifact(&artifact, args.output.as_deref())
        }
        Command::Audio(args) => {
            let artifact = client.download_audio_lesson(args.session_id).await?;
            save_artifact(&artifact, args.output.as_deref())
        }
        Command::Video(args) => {
            let artifact = client.download_video_lesson(args.session_id).await?;
            save_artifact(&artifact, args.output.as_deref())
        }
        Command::Upload {
            file,
            user_id,
            session_id,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
            let mut args = UploadDocumentArgs::new(file_name, bytes, user_id);
            args.session_id = session_id;
            print_json(&client.upload_document(args).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    if settings.logging.json {
        init_json_subscriber(settings.logging.level);
    } else {
        init_subscriber(settings.logging.level);
    }

    run(cli, &settings).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
