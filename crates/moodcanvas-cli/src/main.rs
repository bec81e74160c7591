//! moodcanvas: type a mood, get a quote and artwork to match.
//!
//! Resolves moods against a JSON corpus file (or the built-in seed corpus) and
//! keeps local history in a JSON file. The streak counts successful
//! resolutions within one run.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodcanvas_db::{JsonFileHistoryStore, MemoryContentStore, PublicUrlResolver};
use moodcanvas_search::{
    ContentEntry, EngineConfig, EntryId, Error, HistoryRecord, MoodOutcome, MoodSession,
    OwnerScope,
};

const DEFAULT_HISTORY_FILE: &str = "moodcanvas-history.json";
const DEFAULT_IMAGE_BASE_URL: &str = "http://localhost:54321";
const DEFAULT_IMAGE_BUCKET: &str = "mood_images";

#[derive(Parser)]
#[command(name = "moodcanvas")]
#[command(author, version, about = "Find a quote and artwork for how you feel")]
#[command(propagate_version = true)]
struct Cli {
    /// Corpus file (JSON array of entries). Uses the built-in corpus if omitted.
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// History file (default: $MOODCANVAS_HISTORY_FILE or ./moodcanvas-history.json)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more moods to quotes
    Resolve {
        /// How you feel, e.g. "calm". Several moods resolve in turn.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Personal note saved with the history record
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Show an inspirational quote without typing a mood
    Inspire {
        /// Draw from the moods in your history instead of overall popularity
        #[arg(short, long)]
        personal: bool,
    },

    /// Show quotes related to an entry
    Related {
        /// Entry id
        entry_id: EntryId,

        /// Show one random related quote instead of the full list
        #[arg(short, long)]
        shuffle: bool,
    },

    /// Like an entry, raising its popularity
    Like {
        /// Entry id
        entry_id: EntryId,
    },

    /// Show or clear mood history
    History {
        /// Delete all history
        #[arg(long)]
        clear: bool,
    },

    /// List every mood tag in the corpus
    Tags,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", friendly_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing to stderr, or to a daily-rotated file when `LOG_FILE`
/// is set.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "moodcanvas=warn")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moodcanvas=warn".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = Path::new(path);
        let file_dir = path.parent().unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("moodcanvas.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false)); // no ANSI in files
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

/// History file from the flag, then `MOODCANVAS_HISTORY_FILE`, then the
/// working directory.
fn history_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("MOODCANVAS_HISTORY_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE))
}

/// History store for `path`, keeping no more records on disk than the
/// ledger holds.
fn history_store(path: &Path, config: &EngineConfig) -> JsonFileHistoryStore {
    JsonFileHistoryStore::new(path).with_max_records(config.history_cap)
}

/// What the user sees for a failed command.
fn friendly_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<Error>() {
        Some(Error::EmptyCorpus) => {
            "no quotes are available right now, please try again later".to_string()
        }
        Some(Error::ContentStore(_)) | Some(Error::Timeout(_)) => {
            format!("could not load quotes ({:#})", e)
        }
        Some(Error::NotFound(what)) => format!("{} was not found", what),
        _ => format!("{:#}", e),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EngineConfig::from_env();
    config.validate().context("invalid engine configuration")?;

    let content = Arc::new(match &cli.corpus {
        Some(path) => MemoryContentStore::from_json_file(path).await?,
        None => MemoryContentStore::seeded(),
    });
    let history_file = history_path(cli.history);
    let resolver = PublicUrlResolver::new(
        std::env::var("MOODCANVAS_IMAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
        std::env::var("MOODCANVAS_IMAGE_BUCKET")
            .unwrap_or_else(|_| DEFAULT_IMAGE_BUCKET.to_string()),
    );

    let history = history_store(&history_file, &config);
    let session = MoodSession::new(
        config,
        content.clone(),
        Arc::new(resolver),
        Arc::new(history),
        OwnerScope::Local,
    )
    .with_popularity_mutator(content.clone());

    if let Err(e) = session.load_history().await {
        eprintln!("Warning: could not read history ({})", e);
    }

    match cli.command {
        Commands::Resolve { query, note } => {
            session.refresh_corpus().await?;
            for q in &query {
                let outcome = session.resolve_mood_with_note(q, note.clone()).await?;
                print_outcome(&outcome, cli.json)?;
            }
        }
        Commands::Inspire { personal } => {
            session.refresh_corpus().await?;
            let entry = if personal {
                session.personalized_inspiration().await?
            } else {
                session.daily_inspiration().await?
            };
            print_entry(&entry, cli.json)?;
        }
        Commands::Related { entry_id, shuffle } => {
            session.refresh_corpus().await?;
            let current = find_entry(&session, entry_id).await?;
            if shuffle {
                let next = session.randomize_related(&current).await?;
                print_entry(&next, cli.json)?;
            } else {
                let related = session.related_to(&current).await?;
                print_entries(&related, cli.json)?;
            }
        }
        Commands::Like { entry_id } => {
            let popularity = session.like(entry_id).await?;
            match &cli.corpus {
                Some(path) => content
                    .write_json_file(path)
                    .await
                    .with_context(|| format!("saving likes to {}", path.display()))?,
                None => eprintln!("Note: the built-in corpus does not keep likes between runs"),
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "entry_id": entry_id, "popularity": popularity })
                );
            } else {
                println!("Liked {} (popularity {})", entry_id, popularity);
            }
        }
        Commands::History { clear } => {
            if clear {
                session.clear_history().await?;
                println!("History cleared");
            } else {
                print_history(&session.history().await, cli.json)?;
            }
        }
        Commands::Tags => {
            session.refresh_corpus().await?;
            let corpus = session.corpus().await?;
            for tag in corpus.distinct_tags() {
                println!("{}", tag);
            }
        }
    }
    Ok(())
}

async fn find_entry(session: &MoodSession, id: EntryId) -> anyhow::Result<ContentEntry> {
    let corpus = session.corpus().await?;
    corpus
        .get(id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("entry {}", id)).into())
}

fn print_outcome(outcome: &MoodOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "entry": outcome.entry,
                "tier": outcome.tier,
                "image_url": outcome.image_url,
                "record_id": outcome.record.as_ref().map(|r| r.id),
                "streak": outcome.streak,
                "saved": outcome.persistence_error.is_none(),
            }))?
        );
    } else {
        println!("\"{}\"", outcome.entry.quote);
        println!("  - {}", outcome.entry.author);
        println!("  art:    {}", outcome.image_url);
        println!("  match:  {}", outcome.tier);
        println!("  id:     {}", outcome.entry.id);
        println!("  streak: {}", outcome.streak);
    }
    if outcome.persistence_error.is_some() {
        eprintln!("Warning: this mood was not saved to history");
    }
    Ok(())
}

fn print_entry(entry: &ContentEntry, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("\"{}\"", entry.quote);
        println!("  - {}", entry.author);
        println!("  tags: {}", entry.tags.join(", "));
        println!("  id:   {}", entry.id);
    }
    Ok(())
}

fn print_entries(entries: &[ContentEntry], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No related quotes");
    }
    for entry in entries {
        println!("{}  \"{}\" - {}", entry.id, entry.quote, entry.author);
    }
    Ok(())
}

fn print_history(records: &[HistoryRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No history yet");
    }
    for record in records {
        println!(
            "{}  {:<12} \"{}\"",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.query_text,
            record.resolved_quote
        );
        if let Some(note) = &record.personal_note {
            println!("{:18}note: {}", "", note);
        }
    }
    Ok(())
}
