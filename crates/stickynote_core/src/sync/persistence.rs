//! Load and debounced-save coordination for the note collection.
//!
//! # Responsibility
//! - Pick the initial collection with remote-then-local fallback.
//! - Collapse bursts of changes into one write after a quiet period.
//! - Mirror successful remote writes into the local cache.
//!
//! # Invariants
//! - A non-empty remote result wins; an empty, failed or timed-out remote
//!   fetch defers to the local cache; otherwise the collection starts empty.
//! - A malformed collection from either source is treated like a failed load.
//!   That includes ids or stacking keys with no successor.
//! - The local cache is written only after the remote write succeeds.
//! - Save failures are logged and dropped; there is no retry.
//! - A write that already started is not cancelled by later changes, so it
//!   may land a snapshot older than the live collection.

use crate::config::CanvasConfig;
use crate::model::note::{check_collection, Note};
use crate::store::{decode_notes, encode_notes, LocalCache, RemoteNoteStore, StoreResult};
use crate::sync::debounce::DebounceTimer;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// Where the initial collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Local,
    Empty,
}

impl LoadSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Empty => "empty",
        }
    }
}

/// Initial collection plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    pub source: LoadSource,
}

/// Owns the save timer and the store handles for one canvas.
pub struct PersistenceCoordinator<R: RemoteNoteStore, L: LocalCache> {
    remote: Arc<R>,
    local: Arc<L>,
    cache_key: Arc<str>,
    fetch_timeout: Duration,
    timer: DebounceTimer,
}

impl<R: RemoteNoteStore, L: LocalCache> PersistenceCoordinator<R, L> {
    /// Save timers run on `runtime`; callers may mutate from any thread.
    pub fn new(remote: Arc<R>, local: Arc<L>, config: &CanvasConfig, runtime: Handle) -> Self {
        Self {
            remote,
            local,
            cache_key: Arc::from(config.local_cache_key.as_str()),
            fetch_timeout: config.remote_fetch_timeout(),
            timer: DebounceTimer::new(config.save_debounce(), runtime),
        }
    }

    /// Resolves the initial collection. Never fails.
    pub async fn load(&self) -> LoadedNotes {
        let started_at = Instant::now();
        let fetched = tokio::time::timeout(self.fetch_timeout, self.remote.fetch_notes()).await;
        let loaded = match fetched {
            Ok(Ok(notes)) if notes.is_empty() => self.load_local(),
            Ok(Ok(notes)) => match check_collection(&notes) {
                Ok(()) => LoadedNotes {
                    notes,
                    source: LoadSource::Remote,
                },
                Err(err) => {
                    warn!("event=notes_load module=persistence status=remote_corrupt error={err}");
                    self.load_local()
                }
            },
            Ok(Err(err)) => {
                warn!("event=notes_load module=persistence status=remote_error error={err}");
                self.load_local()
            }
            Err(_) => {
                warn!(
                    "event=notes_load module=persistence status=remote_timeout timeout_ms={}",
                    self.fetch_timeout.as_millis()
                );
                self.load_local()
            }
        };
        info!(
            "event=notes_load module=persistence status=ok source={} count={} duration_ms={}",
            loaded.source.as_str(),
            loaded.notes.len(),
            started_at.elapsed().as_millis()
        );
        loaded
    }

    fn load_local(&self) -> LoadedNotes {
        let empty = LoadedNotes {
            notes: Vec::new(),
            source: LoadSource::Empty,
        };
        let raw = match self.local.get(&self.cache_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return empty,
            Err(err) => {
                warn!("event=notes_load module=persistence status=local_error error={err}");
                return empty;
            }
        };
        let decoded = decode_notes(&raw).and_then(|notes| {
            check_collection(&notes)?;
            Ok(notes)
        });
        match decoded {
            Ok(notes) => LoadedNotes {
                notes,
                source: LoadSource::Local,
            },
            Err(err) => {
                warn!("event=notes_load module=persistence status=local_corrupt error={err}");
                empty
            }
        }
    }

    /// Restarts the quiet period with `notes` as the snapshot to write.
    pub fn schedule_save(&mut self, notes: Vec<Note>) {
        let remote = Arc::clone(&self.remote);
        let local = Arc::clone(&self.local);
        let key = Arc::clone(&self.cache_key);
        self.timer.schedule(async move {
            if let Err(err) = write_snapshot(remote.as_ref(), local.as_ref(), &key, notes).await {
                warn!("event=notes_save module=persistence status=dropped error={err}");
            }
        });
    }

    /// Cancels the pending timer and writes `notes` immediately.
    pub async fn flush(&mut self, notes: Vec<Note>) -> StoreResult<()> {
        self.timer.cancel();
        let result = write_snapshot(
            self.remote.as_ref(),
            self.local.as_ref(),
            &self.cache_key,
            notes,
        )
        .await;
        if let Err(err) = &result {
            warn!("event=notes_flush module=persistence status=error error={err}");
        }
        result
    }

    pub fn has_pending_save(&self) -> bool {
        self.timer.is_pending()
    }
}

async fn write_snapshot<R: RemoteNoteStore, L: LocalCache>(
    remote: &R,
    local: &L,
    key: &str,
    notes: Vec<Note>,
) -> StoreResult<()> {
    let started_at = Instant::now();
    let count = notes.len();
    let encoded = encode_notes(&notes)?;
    remote.save_notes(notes).await?;
    local.set(key, &encoded)?;
    info!(
        "event=notes_save module=persistence status=ok count={} duration_ms={}",
        count,
        started_at.elapsed().as_millis()
    );
    Ok(())
}
