//! Domain model for canvas notes.
//!
//! # Responsibility
//! - Define the persisted note shape and the geometry it is placed with.
//! - Keep creation-time placement rules next to the data they produce.
//!
//! # Invariants
//! - Every note is identified by a stable integer `NoteId`.
//! - Deletion removes the note; there are no tombstones.

pub mod geometry;
pub mod note;
