//! Core engine for the sticky-note canvas.
//! Owns note layout rules, pointer interaction and persistence scheduling.

pub mod config;
pub mod db;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod sync;

pub use config::{CanvasConfig, ConfigError};
pub use interaction::session::{
    InteractionError, InteractionResult, InteractionState, NoteInteraction, SessionKind,
    SessionRelease,
};
pub use interaction::surface::{
    FixedTrashRegion, FixedViewport, TrashRegionProvider, ViewportProvider,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::geometry::{clamp, rectangles_intersect, Point, Rect, Size};
pub use model::note::{
    check_collection, ColorChoice, CreateNoteRequest, Note, NoteId, NotePatch,
    NoteValidationError, PALETTE,
};
pub use service::board_service::NoteBoard;
pub use service::canvas_service::{CanvasService, ReleaseOutcome};
pub use store::{
    InMemoryRemoteStore, LocalCache, MemoryLocalCache, RemoteNoteStore, SqliteLocalCache,
    StoreError, StoreResult,
};
pub use sync::debounce::DebounceTimer;
pub use sync::persistence::{LoadSource, LoadedNotes, PersistenceCoordinator};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
