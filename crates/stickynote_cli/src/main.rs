//! CLI entry point for driving a canvas against a local SQLite cache.
//!
//! # Responsibility
//! - Provide a small executable to inspect and edit a cached note board.
//! - Exercise the same load/flush path the UI shell uses.
//!
//! The remote store is the in-process emulation, so every run loads from the
//! local cache and mirrors its changes back there on exit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stickynote_core::{
    default_log_level, init_logging, CanvasConfig, CanvasService, ColorChoice, CreateNoteRequest,
    FixedTrashRegion, FixedViewport, InMemoryRemoteStore, NoteId, Point, ReleaseOutcome, Size,
    SqliteLocalCache,
};

#[derive(Debug, Parser)]
#[command(name = "stickynote", version, about = "Sticky-note canvas tool")]
struct Cli {
    /// SQLite file holding the local note cache.
    #[arg(long, default_value = "stickynote.sqlite3")]
    cache: PathBuf,

    /// JSON file with canvas settings (`save_debounce_ms`, `local_cache_key`,
    /// `remote_fetch_timeout_ms`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, default_value_t = 1024.0)]
    viewport_width: f64,

    #[arg(long, default_value_t = 768.0)]
    viewport_height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check core linkage.
    Ping,
    /// Print every note in render order.
    List,
    /// Create a note using toolbar semantics.
    Create {
        #[arg(long, default_value_t = 20.0)]
        x: f64,
        #[arg(long, default_value_t = 80.0)]
        y: f64,
        #[arg(long, default_value_t = 200.0)]
        width: f64,
        #[arg(long, default_value_t = 200.0)]
        height: f64,
        /// random, a palette name, or a hex color.
        #[arg(long, default_value = "random")]
        color: ColorChoice,
    },
    /// Delete a note by id.
    Delete {
        #[arg(long)]
        id: NoteId,
    },
    /// Drag a note by its header; dropping on the trash deletes it.
    Move {
        #[arg(long)]
        id: NoteId,
        #[arg(long, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, allow_hyphen_values = true)]
        dy: f64,
    },
    /// Replace a note's body markup.
    Content {
        #[arg(long)]
        id: NoteId,
        #[arg(long)]
        body: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: {err}");
        }
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("stickynote_core ping={}", stickynote_core::ping());
        println!("stickynote_core version={}", stickynote_core::core_version());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read config `{}`: {err}", path.display()))?;
            CanvasConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => CanvasConfig::default(),
    };
    let local = SqliteLocalCache::open(&cli.cache)
        .map_err(|err| format!("cannot open cache `{}`: {err}", cli.cache.display()))?;
    let viewport = Size::new(cli.viewport_width, cli.viewport_height);
    let mut canvas = CanvasService::open(
        &config,
        Arc::new(InMemoryRemoteStore::new()),
        Arc::new(local),
        Box::new(FixedViewport(viewport)),
        Box::new(FixedTrashRegion::bottom_right(viewport)),
    )
    .await;

    match cli.command {
        Command::Ping => return Ok(()),
        Command::List => {
            for note in canvas.notes() {
                println!(
                    "#{} at ({}, {}) size {}x{} z={} color={} content_len={}",
                    note.id,
                    note.x,
                    note.y,
                    note.width,
                    note.height,
                    note.z_index,
                    note.color,
                    note.content.len()
                );
            }
            return Ok(());
        }
        Command::Create {
            x,
            y,
            width,
            height,
            color,
        } => {
            let note = canvas.create_note(&CreateNoteRequest {
                position: Point::new(x, y),
                size: Size::new(width, height),
                color,
            });
            println!("created #{} at ({}, {})", note.id, note.x, note.y);
        }
        Command::Delete { id } => {
            if !canvas.delete_note(id) {
                return Err(format!("note {id} not found"));
            }
            println!("deleted #{id}");
        }
        Command::Move { id, dx, dy } => {
            let origin = canvas
                .display_geometry(id)
                .ok_or_else(|| format!("note {id} not found"))?
                .origin();
            let grip = Point::new(origin.x + 10.0, origin.y + 10.0);
            canvas
                .begin_drag(id, grip)
                .map_err(|err| err.to_string())?;
            canvas.pointer_move(Point::new(grip.x + dx, grip.y + dy));
            match canvas.pointer_up() {
                Some(ReleaseOutcome::Updated(release)) => println!(
                    "moved #{id} to ({}, {})",
                    release.geometry.x, release.geometry.y
                ),
                Some(ReleaseOutcome::Trashed(_)) => println!("trashed #{id}"),
                Some(ReleaseOutcome::Discarded(_)) | None => {
                    return Err(format!("note {id} vanished during drag"))
                }
            }
        }
        Command::Content { id, body } => {
            if canvas.board().get(id).is_none() {
                return Err(format!("note {id} not found"));
            }
            if !canvas.update_content(id, &body) {
                println!("#{id} unchanged");
                return Ok(());
            }
            println!("updated #{id}");
        }
    }

    canvas
        .flush()
        .await
        .map_err(|err| format!("save failed: {err}"))
}
