//! Pointer interaction layer.
//!
//! # Responsibility
//! - Convert pointer gestures into clamped note geometry.
//! - Describe the rendering-layer collaborators queried during gestures.
//!
//! # Invariants
//! - Sessions never write to the authoritative note collection.

pub mod session;
pub mod surface;
