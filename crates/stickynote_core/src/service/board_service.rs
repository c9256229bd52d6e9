//! Note collection controller.
//!
//! # Responsibility
//! - Own the authoritative ordered list of notes.
//! - Assign ids and stacking order, apply partial updates and deletions.
//! - Delete notes whose dropped rectangle hits the trash region.
//!
//! # Invariants
//! - Ids are unique; new ids are `max(ids) + 1`.
//! - List order is insertion order; deletion removes in place. `z_index`
//!   only affects stacking, never list order.
//! - `bring_to_front` leaves the note strictly above every other note.
//! - Operations on an unknown id are silent no-ops, since interaction
//!   sessions may race a deletion.

use crate::model::geometry::{rectangles_intersect, Point, Rect, Size};
use crate::model::note::{new_note, CreateNoteRequest, Note, NoteId, NotePatch};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Authoritative note collection.
pub struct NoteBoard {
    notes: Vec<Note>,
    rng: StdRng,
}

impl Default for NoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteBoard {
    /// Creates an empty board with an entropy-seeded color generator.
    pub fn new() -> Self {
        Self::from_notes(Vec::new())
    }

    /// Adopts an already persisted collection.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self::with_rng(notes, StdRng::from_entropy())
    }

    /// Adopts `notes` with a caller-supplied color generator.
    pub fn with_rng(notes: Vec<Note>, rng: StdRng) -> Self {
        Self { notes, rng }
    }

    /// Notes in render order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Topmost note whose rectangle contains `point`.
    ///
    /// Edges are inclusive. Ties on `z_index` go to the later note in render
    /// order, which is the one painted last.
    pub fn note_at(&self, point: Point) -> Option<&Note> {
        self.notes
            .iter()
            .filter(|note| {
                let rect = note.geometry();
                point.x >= rect.left()
                    && point.x <= rect.right()
                    && point.y >= rect.top()
                    && point.y <= rect.bottom()
            })
            .max_by_key(|note| note.z_index)
    }

    /// Creates a note placed inside `viewport` and appends it.
    ///
    /// Never fails: out-of-range input is clamped, not rejected.
    pub fn create_note(&mut self, request: &CreateNoteRequest, viewport: Size) -> Note {
        let color = request.color.resolve(&mut self.rng);
        let note = new_note(&self.notes, request.position, request.size, color, viewport);
        info!(
            "event=note_create module=board status=ok note_id={} z_index={}",
            note.id, note.z_index
        );
        self.notes.push(note.clone());
        note
    }

    /// Merges `patch` into the note with `id`.
    ///
    /// Returns `false` when no such note exists.
    pub fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.apply(patch);
                true
            }
            None => {
                debug!("event=note_update module=board status=skipped reason=stale_id note_id={id}");
                false
            }
        }
    }

    /// Replaces note content when it actually differs.
    ///
    /// Returns `true` only when the content changed.
    pub fn update_content(&mut self, id: NoteId, content: &str) -> bool {
        let changed = self.get(id).is_some_and(|note| note.content != content);
        if !changed {
            return false;
        }
        self.update_note(id, &NotePatch::content(content))
    }

    /// Removes the note with `id`, keeping the order of the others.
    pub fn delete_note(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        let removed = self.notes.len() != before;
        if removed {
            info!("event=note_delete module=board status=ok note_id={id}");
        } else {
            debug!("event=note_delete module=board status=skipped reason=stale_id note_id={id}");
        }
        removed
    }

    /// Raises the note above all others.
    ///
    /// Sets `z_index = max(all z_index, 0) + 1` and returns it, or `None`
    /// when no such note exists.
    pub fn bring_to_front(&mut self, id: NoteId) -> Option<i64> {
        self.get(id)?;
        let top = self
            .notes
            .iter()
            .map(|note| note.z_index)
            .fold(0, i64::max)
            .saturating_add(1);
        self.update_note(id, &NotePatch::z_index(top));
        Some(top)
    }

    /// Deletes the note when its dropped rectangle touches the trash region.
    ///
    /// Returns `true` when the note was deleted.
    pub fn handle_drop(&mut self, id: NoteId, rect: Rect, trash: Option<Rect>) -> bool {
        let Some(trash) = trash else {
            return false;
        };
        if !rectangles_intersect(&rect, &trash) {
            return false;
        }
        info!("event=note_trash module=board status=hit note_id={id}");
        self.delete_note(id)
    }
}
