use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use palette::config::{ConfigError, EditorConfig, default_backup_path};
use palette::engine::EngineCore;
use palette::history::HistoryInfo;
use palette::input::EditorEvent;
use palette::persist::to_persisted;
use palette::storage::{FileStorage, StorageError, load, save};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("cannot read {}: {source}", path.display())]
    Script { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "palette", about = "Rectangle editor core: replay input, inspect and seed documents")]
struct Cli {
    /// Document file.
    #[arg(long, env = "PALETTE_DOC_PATH")]
    doc: Option<PathBuf>,

    /// Backup file; defaults to `<doc>.bak`.
    #[arg(long, env = "PALETTE_BACKUP_PATH")]
    backup: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON array of frames (each an array of events) against the stored document.
    Replay {
        script: PathBuf,
        /// Do not write the resulting document back.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the stored document.
    Show,
    /// Add `count` random rectangles as one undoable step and save.
    Spawn { count: usize },
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    loaded_from: &'static str,
    frames: usize,
    events: usize,
    moves_dropped: usize,
    hit_tests: usize,
    shapes: usize,
    history: HistoryInfo,
    saved: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "palette failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = EditorConfig::from_env()?;
    if let Some(doc) = cli.doc {
        config.backup_path = default_backup_path(&doc);
        config.doc_path = doc;
    }
    if let Some(backup) = cli.backup {
        config.backup_path = backup;
    }
    let mut storage = FileStorage::new(&config.doc_path, &config.backup_path);

    match cli.command {
        Command::Replay { script, dry_run } => run_replay(&config, &mut storage, &script, dry_run),
        Command::Show => run_show(&storage),
        Command::Spawn { count } => run_spawn(&config, &mut storage, count),
    }
}

fn run_replay(config: &EditorConfig, storage: &mut FileStorage, script: &Path, dry_run: bool) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(script).map_err(|source| CliError::Script { path: script.to_path_buf(), source })?;
    let frames: Vec<Vec<EditorEvent>> = serde_json::from_str(&raw)?;

    let loaded = load(&*storage);
    let initial = loaded.doc.clone();
    let mut engine = EngineCore::with_config(config);
    engine.hydrate(loaded.doc);

    let mut summary = ReplaySummary {
        loaded_from: loaded.source.as_str(),
        frames: frames.len(),
        events: 0,
        moves_dropped: 0,
        hit_tests: 0,
        shapes: 0,
        history: HistoryInfo::default(),
        saved: false,
    };

    let mut now = 0.0;
    for frame in frames {
        let started = Instant::now();
        for event in frame {
            engine.enqueue(event);
        }
        now += config.frame_ms;
        let report = engine.process_frame(now);
        engine.end_frame(started.elapsed().as_secs_f64() * 1000.0);

        summary.events += report.events_processed;
        summary.moves_dropped += report.moves_dropped;
        summary.hit_tests += report.hit_tests;
    }

    summary.shapes = engine.document().len();
    summary.history = engine.history_info();

    let changed = !engine.document().ptr_eq(&initial);
    if changed && !dry_run {
        save(storage, engine.document())?;
        summary.saved = true;
    }
    info!(frames = summary.frames, events = summary.events, changed, "replay finished");

    print_json(&summary)
}

fn run_show(storage: &FileStorage) -> Result<(), CliError> {
    let loaded = load(storage);
    info!(source = loaded.source.as_str(), warnings = loaded.warnings.len(), "document loaded");
    print_json(&to_persisted(&loaded.doc))
}

fn run_spawn(config: &EditorConfig, storage: &mut FileStorage, count: usize) -> Result<(), CliError> {
    let loaded = load(&*storage);
    let mut engine = EngineCore::with_config(config);
    engine.hydrate(loaded.doc);
    engine.dispatch(&EditorEvent::SpawnShapes { count });

    if count > 0 {
        save(storage, engine.document())?;
    }
    info!(count, shapes = engine.document().len(), "spawned shapes");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
