/// TapTune console - drive the scan pipeline from a terminal
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taptune_core::{TagPayload, TagReader};
use taptune_scan::{
    HistoryStore, ScanEvent, ScanHandle, ScanHistory, ScanService, ScanState, SessionPhase,
};
use taptune_storage::{preferences, SqliteHistoryStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod config;
mod playback;
mod reader;

use crate::config::ConsoleConfig;
use crate::playback::ConsolePlayback;
use crate::reader::{NullTagReader, ScriptedTagReader};

#[derive(Parser)]
#[command(name = "taptune")]
#[command(about = "NFC tags to music: scan, resolve, play", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scan service on scripted tag input
    Run {
        /// Hex payload script, one tag per line (stdin when omitted)
        #[arg(short, long)]
        tags: Option<PathBuf>,
    },
    /// Put a catalog entry through the scan pipeline
    Simulate {
        /// Catalog id to resolve
        id: String,
    },
    /// Play a catalog entry without recording a scan
    Play {
        /// Catalog id to play
        id: String,
    },
    /// Decode a hex-encoded tag payload and resolve it against the catalog
    Decode {
        /// Raw tag payload as hex
        payload: String,
    },
    /// Show the persisted scan history
    History {
        /// Clear the history instead of showing it
        #[arg(long)]
        clear: bool,
    },
    /// List the content catalog
    Catalog,
    /// Show or set the keep-awake preference
    KeepAwake {
        /// New value; shows the current one when omitted
        value: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "warn,taptune=info,taptune_scan=info,taptune_storage=info,taptune_catalog=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { tags } => {
            run(&load_config(config_path)?, tags).await?;
        }
        Commands::Simulate { id } => {
            simulate(&load_config(config_path)?, &id).await?;
        }
        Commands::Play { id } => {
            play(&load_config(config_path)?, &id).await?;
        }
        Commands::Decode { payload } => {
            decode_payload(&load_config(config_path)?, &payload)?;
        }
        Commands::History { clear } => {
            history(&load_config(config_path)?, clear).await?;
        }
        Commands::Catalog => {
            list_catalog(&load_config(config_path)?)?;
        }
        Commands::KeepAwake { value } => {
            keep_awake(&load_config(config_path)?, value).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ConsoleConfig> {
    let config = ConsoleConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

async fn open_database(config: &ConsoleConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = taptune_storage::create_pool(&config.storage.database_url).await?;
    taptune_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn spawn_service(
    config: &ConsoleConfig,
    reader: Arc<dyn TagReader>,
) -> anyhow::Result<(ScanHandle, JoinHandle<()>)> {
    let pool = open_database(config).await?;

    let catalog = Arc::new(catalog::load(&config.catalog)?);
    tracing::info!("Catalog ready with {} entries", catalog.len());

    let store = Arc::new(SqliteHistoryStore::new(pool));
    Ok(ScanService::spawn(
        reader,
        catalog,
        Arc::new(ConsolePlayback),
        store,
        config.scan.clone(),
    ))
}

async fn run(config: &ConsoleConfig, tags: Option<PathBuf>) -> anyhow::Result<()> {
    let reader: Arc<dyn TagReader> = match &tags {
        Some(path) => Arc::new(ScriptedTagReader::from_file(path)),
        None => {
            println!("Reading hex tag payloads from stdin, one per line (Ctrl-D ends)");
            Arc::new(ScriptedTagReader::from_stdin())
        }
    };

    let (handle, task) = spawn_service(config, reader).await?;

    // This round trip returns only after startup (support probe plus the
    // automatic scan start) has settled
    let session = handle.session().await?;
    if session.phase() != SessionPhase::Scanning {
        if let Some(error) = &session.last_error {
            println!("Reader did not arm: {error}");
        }
        handle.shutdown().await;
        task.await?;
        anyhow::bail!("scan session did not start");
    }

    // Subscribed after startup settled, so everything from here on is live
    // scan activity
    let mut events = handle.subscribe();
    println!("Scanning for tags (Ctrl-C to stop)");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let stopped = matches!(
                        &event,
                        ScanEvent::SessionChanged { session } if session.scan == ScanState::Idle
                    );
                    print_event(&event);
                    if stopped {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    let records = handle.history().await?;
    println!("{} scan(s) in history", records.len());

    handle.shutdown().await;
    task.await?;
    Ok(())
}

async fn simulate(config: &ConsoleConfig, id: &str) -> anyhow::Result<()> {
    let (handle, task) = spawn_service(config, Arc::new(NullTagReader)).await?;

    // Let startup settle so the drain below only sees this command's events
    let _ = handle.session().await?;
    let mut events = handle.subscribe();

    match handle.simulate_scan(id).await? {
        Some(descriptor) => {
            println!("Resolved '{}': {} ({})", id, descriptor.title, descriptor.kind);
        }
        None => println!("No catalog entry with id '{id}'"),
    }

    // The command was answered, so all of its events are already queued
    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }

    handle.shutdown().await;
    task.await?;
    Ok(())
}

async fn play(config: &ConsoleConfig, id: &str) -> anyhow::Result<()> {
    let (handle, task) = spawn_service(config, Arc::new(NullTagReader)).await?;

    let _ = handle.session().await?;
    let mut events = handle.subscribe();

    if handle.play(id).await?.is_none() {
        println!("No catalog entry with id '{id}'");
    }

    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }

    handle.shutdown().await;
    task.await?;
    Ok(())
}

/// Dry-run a payload through the pipeline: decode, resolve, classify.
/// Touches no database and records nothing.
fn decode_payload(config: &ConsoleConfig, payload: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(payload.trim()).context("payload is not valid hex")?;

    let Some(text) = taptune_ndef::decode(&TagPayload::Bytes(bytes)) else {
        println!("Decoded: (no text payload)");
        return Ok(());
    };
    println!("Decoded: {text}");

    let entries = catalog::load(&config.catalog)?;
    if let Some(entry) = entries.resolve(&text) {
        println!("Catalog: {} ({})", entry.title, entry.kind);
        if let Some(url) = entry.primary_url() {
            println!("  {url}");
        }
        return Ok(());
    }
    println!("Catalog: no entry for '{text}'");

    match taptune_catalog::classify(&text) {
        Some(descriptor) => {
            println!("Classifier: {} ({})", descriptor.title, descriptor.kind);
            if let Some(url) = descriptor.primary_url() {
                println!("  {url}");
            }
        }
        None => println!("Classifier: no match"),
    }
    Ok(())
}

async fn history(config: &ConsoleConfig, clear: bool) -> anyhow::Result<()> {
    let pool = open_database(config).await?;
    let store = SqliteHistoryStore::new(pool);

    if clear {
        store.clear().await?;
        println!("Scan history cleared");
        return Ok(());
    }

    let Some(json) = store.load().await? else {
        println!("No scans recorded");
        return Ok(());
    };

    let records = ScanHistory::from_json(&json, config.scan.history_capacity)?;
    if records.is_empty() {
        println!("No scans recorded");
        return Ok(());
    }

    println!("Scan history, newest first:");
    for record in records.iter() {
        println!(
            "  {}  {} ({})",
            format_timestamp(record.timestamp),
            record.descriptor.title,
            record.descriptor.kind
        );
    }
    Ok(())
}

fn list_catalog(config: &ConsoleConfig) -> anyhow::Result<()> {
    let entries = catalog::load(&config.catalog)?;

    println!("Catalog ({} entries):", entries.len());
    for entry in entries.iter() {
        match &entry.artist {
            Some(artist) => {
                println!("  {} - {} by {} ({})", entry.id, entry.title, artist, entry.kind);
            }
            None => println!("  {} - {} ({})", entry.id, entry.title, entry.kind),
        }
    }
    Ok(())
}

async fn keep_awake(config: &ConsoleConfig, value: Option<bool>) -> anyhow::Result<()> {
    let pool = open_database(config).await?;

    match value {
        Some(enabled) => {
            preferences::set_keep_awake(&pool, enabled).await?;
            println!("Keep-awake set to {enabled}");
        }
        None => {
            let enabled = preferences::keep_awake(&pool).await?;
            println!("Keep-awake is {}", if enabled { "on" } else { "off" });
        }
    }
    Ok(())
}

fn print_event(event: &ScanEvent) {
    match event {
        ScanEvent::SessionChanged { session } => match &session.last_error {
            Some(error) => println!("Session: {:?} ({error})", session.phase()),
            None => println!("Session: {:?}", session.phase()),
        },
        // The playback sink announces what it plays
        ScanEvent::NowPlaying { .. } => {}
        ScanEvent::HistoryChanged { length } => println!("History: {length} scan(s)"),
        ScanEvent::Unrecognized { text } => println!("Unrecognized tag text: {text}"),
        ScanEvent::DecodeFailed => println!("Tag payload carried no readable text"),
        ScanEvent::ExternalLink { url, kind } => println!("Open in {kind}: {url}"),
        ScanEvent::Error { message } => println!("Error: {message}"),
    }
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|when| when.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}
