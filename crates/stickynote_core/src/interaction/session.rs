//! Per-note drag/resize session.
//!
//! # Responsibility
//! - Turn raw pointer positions into clamped note geometry.
//! - Report the finalized geometry once when the pointer is released.
//!
//! # Invariants
//! - At most one session is active per note; starting another while active
//!   is rejected without changing state.
//! - The session only holds a transient copy of geometry. It never mutates
//!   the authoritative note; the owner consumes `SessionRelease` instead.
//! - Drag keeps `0 <= x <= vw - width` and `60 <= y <= vh - height`.
//! - Resize keeps both sides `>= 120` and the far edges inside the viewport.

use crate::model::geometry::{clamp, Point, Rect, Size};
use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top floor while dragging. Looser than the 70px creation floor.
pub const DRAG_MIN_Y: f64 = 60.0;
/// Minimum width and height while resizing.
pub const RESIZE_MIN_SIDE: f64 = 120.0;

pub type InteractionResult<T> = Result<T, InteractionError>;

/// Caller contract violations for interaction sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionError {
    /// A drag or resize is already running for this note.
    SessionActive(NoteId),
    /// No note with this id exists to start a session on.
    NoteNotFound(NoteId),
}

impl Display for InteractionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionActive(id) => write!(f, "interaction already active for note {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
        }
    }
}

impl Error for InteractionError {}

/// Which gesture a session performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Drag,
    Resize,
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    /// `offset` is pointer minus note position at drag start.
    Dragging { offset: Point },
    /// `anchor` is the pointer at resize start, `initial` the size then.
    Resizing { anchor: Point, initial: Size },
}

/// Finalized geometry emitted exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionRelease {
    pub note_id: NoteId,
    pub geometry: Rect,
    pub kind: SessionKind,
}

/// Transient interaction state for one note.
#[derive(Debug, Clone)]
pub struct NoteInteraction {
    note_id: NoteId,
    geometry: Rect,
    state: InteractionState,
}

impl NoteInteraction {
    /// Creates an idle session seeded with the note's current geometry.
    pub fn new(note_id: NoteId, geometry: Rect) -> Self {
        Self {
            note_id,
            geometry,
            state: InteractionState::Idle,
        }
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    /// Geometry to display right now, including uncommitted movement.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    /// Enters `Dragging`, anchoring the pointer relative to the note origin.
    pub fn start_drag(&mut self, pointer: Point) -> InteractionResult<()> {
        self.ensure_idle()?;
        self.state = InteractionState::Dragging {
            offset: Point::new(pointer.x - self.geometry.x, pointer.y - self.geometry.y),
        };
        Ok(())
    }

    /// Enters `Resizing`, remembering the pointer and the current size.
    pub fn start_resize(&mut self, pointer: Point) -> InteractionResult<()> {
        self.ensure_idle()?;
        self.state = InteractionState::Resizing {
            anchor: pointer,
            initial: self.geometry.size(),
        };
        Ok(())
    }

    /// Applies one pointer move against the live viewport.
    ///
    /// Returns `false` when idle (the move is ignored).
    pub fn pointer_move(&mut self, pointer: Point, viewport: Size) -> bool {
        match self.state {
            InteractionState::Idle => false,
            InteractionState::Dragging { offset } => {
                self.geometry.x = clamp(
                    pointer.x - offset.x,
                    0.0,
                    viewport.width - self.geometry.width,
                );
                self.geometry.y = clamp(
                    pointer.y - offset.y,
                    DRAG_MIN_Y,
                    viewport.height - self.geometry.height,
                );
                true
            }
            InteractionState::Resizing { anchor, initial } => {
                self.geometry.width = clamp(
                    initial.width + (pointer.x - anchor.x),
                    RESIZE_MIN_SIDE,
                    viewport.width - self.geometry.x,
                );
                self.geometry.height = clamp(
                    initial.height + (pointer.y - anchor.y),
                    RESIZE_MIN_SIDE,
                    viewport.height - self.geometry.y,
                );
                true
            }
        }
    }

    /// Ends the session and returns its finalized geometry.
    ///
    /// Returns `None` when no session was active.
    pub fn release(&mut self) -> Option<SessionRelease> {
        let kind = match self.state {
            InteractionState::Idle => return None,
            InteractionState::Dragging { .. } => SessionKind::Drag,
            InteractionState::Resizing { .. } => SessionKind::Resize,
        };
        self.state = InteractionState::Idle;
        Some(SessionRelease {
            note_id: self.note_id,
            geometry: self.geometry,
            kind,
        })
    }

    fn ensure_idle(&self) -> InteractionResult<()> {
        if self.is_active() {
            return Err(InteractionError::SessionActive(self.note_id));
        }
        Ok(())
    }
}
