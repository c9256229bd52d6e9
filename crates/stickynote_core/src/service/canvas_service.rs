//! Canvas use-case service.
//!
//! # Responsibility
//! - Be the single owner of the authoritative note collection.
//! - Route pointer gestures through one interaction session at a time.
//! - Schedule a debounced save after every collection change.
//!
//! # Invariants
//! - Only one session is active at a time (single pointer).
//! - A session geometry reaches the collection only through `pointer_up`,
//!   as one update followed by the trash check for drags.
//! - Viewport and trash region are queried at the moment they are needed.

use crate::config::CanvasConfig;
use crate::interaction::session::{
    InteractionError, InteractionResult, NoteInteraction, SessionKind, SessionRelease,
};
use crate::interaction::surface::{TrashRegionProvider, ViewportProvider};
use crate::model::geometry::{Point, Rect};
use crate::model::note::{CreateNoteRequest, Note, NoteId, NotePatch};
use crate::service::board_service::NoteBoard;
use crate::store::{LocalCache, RemoteNoteStore, StoreResult};
use crate::sync::persistence::{LoadSource, PersistenceCoordinator};
use log::debug;
use std::sync::Arc;
use tokio::runtime::Handle;

/// What happened to a note when its session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Geometry was written back to the note.
    Updated(SessionRelease),
    /// The drag ended on the trash region and the note was deleted.
    Trashed(SessionRelease),
    /// The note was deleted while the session ran; nothing was applied.
    Discarded(SessionRelease),
}

/// One open canvas: collection, interaction session and persistence.
pub struct CanvasService<R: RemoteNoteStore, L: LocalCache> {
    board: NoteBoard,
    persistence: PersistenceCoordinator<R, L>,
    viewport: Box<dyn ViewportProvider>,
    trash: Box<dyn TrashRegionProvider>,
    session: Option<NoteInteraction>,
    load_source: LoadSource,
}

impl<R: RemoteNoteStore, L: LocalCache> CanvasService<R, L> {
    /// Loads the initial collection and returns a ready canvas.
    ///
    /// Must be awaited on a Tokio runtime; later saves are scheduled on that
    /// runtime even when mutators are called from other threads.
    pub async fn open(
        config: &CanvasConfig,
        remote: Arc<R>,
        local: Arc<L>,
        viewport: Box<dyn ViewportProvider>,
        trash: Box<dyn TrashRegionProvider>,
    ) -> Self {
        let persistence = PersistenceCoordinator::new(remote, local, config, Handle::current());
        let loaded = persistence.load().await;
        Self {
            board: NoteBoard::from_notes(loaded.notes),
            persistence,
            viewport,
            trash,
            session: None,
            load_source: loaded.source,
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.board.notes()
    }

    pub fn board(&self) -> &NoteBoard {
        &self.board
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Geometry the rendering layer should draw for `id` right now.
    ///
    /// While a session runs this is the session copy, otherwise the note.
    pub fn display_geometry(&self, id: NoteId) -> Option<Rect> {
        match &self.session {
            Some(session) if session.note_id() == id => Some(session.geometry()),
            _ => self.board.get(id).map(Note::geometry),
        }
    }

    pub fn create_note(&mut self, request: &CreateNoteRequest) -> Note {
        let viewport = self.viewport.viewport_size();
        let note = self.board.create_note(request, viewport);
        self.collection_changed();
        note
    }

    pub fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> bool {
        let applied = self.board.update_note(id, patch);
        if applied {
            self.collection_changed();
        }
        applied
    }

    /// Stores edited body markup; unchanged content is not saved again.
    pub fn update_content(&mut self, id: NoteId, content: &str) -> bool {
        let applied = self.board.update_content(id, content);
        if applied {
            self.collection_changed();
        }
        applied
    }

    pub fn delete_note(&mut self, id: NoteId) -> bool {
        let removed = self.board.delete_note(id);
        if removed {
            self.collection_changed();
        }
        removed
    }

    pub fn bring_to_front(&mut self, id: NoteId) -> Option<i64> {
        let z_index = self.board.bring_to_front(id);
        if z_index.is_some() {
            self.collection_changed();
        }
        z_index
    }

    /// Deletes `id` when `rect` touches the current trash region.
    pub fn handle_drop(&mut self, id: NoteId, rect: Rect) -> bool {
        let trash = self.trash.trash_region();
        let removed = self.board.handle_drop(id, rect, trash);
        if removed {
            self.collection_changed();
        }
        removed
    }

    /// Brings `id` to front and starts dragging it from `pointer`.
    pub fn begin_drag(&mut self, id: NoteId, pointer: Point) -> InteractionResult<()> {
        let mut session = self.prepare_session(id)?;
        session.start_drag(pointer)?;
        self.session = Some(session);
        Ok(())
    }

    /// Brings `id` to front and starts resizing it from `pointer`.
    pub fn begin_resize(&mut self, id: NoteId, pointer: Point) -> InteractionResult<()> {
        let mut session = self.prepare_session(id)?;
        session.start_resize(pointer)?;
        self.session = Some(session);
        Ok(())
    }

    /// Feeds one pointer move to the active session.
    ///
    /// Returns the session geometry, or `None` when no session is active.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Rect> {
        let session = self.session.as_mut()?;
        let viewport = self.viewport.viewport_size();
        session.pointer_move(pointer, viewport);
        Some(session.geometry())
    }

    /// Ends the active session and commits its geometry.
    ///
    /// Drags are additionally checked against the trash region.
    pub fn pointer_up(&mut self) -> Option<ReleaseOutcome> {
        let release = self.session.take()?.release()?;
        if !self.update_note(release.note_id, &NotePatch::geometry(release.geometry)) {
            debug!(
                "event=session_release module=canvas status=discarded note_id={}",
                release.note_id
            );
            return Some(ReleaseOutcome::Discarded(release));
        }
        if release.kind == SessionKind::Drag && self.handle_drop(release.note_id, release.geometry)
        {
            return Some(ReleaseOutcome::Trashed(release));
        }
        Some(ReleaseOutcome::Updated(release))
    }

    /// Writes the current collection now instead of waiting for the timer.
    pub async fn flush(&mut self) -> StoreResult<()> {
        let snapshot = self.board.notes().to_vec();
        self.persistence.flush(snapshot).await
    }

    pub fn has_pending_save(&self) -> bool {
        self.persistence.has_pending_save()
    }

    fn prepare_session(&mut self, id: NoteId) -> InteractionResult<NoteInteraction> {
        if let Some(active) = &self.session {
            return Err(InteractionError::SessionActive(active.note_id()));
        }
        self.bring_to_front(id)
            .ok_or(InteractionError::NoteNotFound(id))?;
        let geometry = self
            .board
            .get(id)
            .map(Note::geometry)
            .ok_or(InteractionError::NoteNotFound(id))?;
        Ok(NoteInteraction::new(id, geometry))
    }

    fn collection_changed(&mut self) {
        self.persistence.schedule_save(self.board.notes().to_vec());
    }
}
