//! Persistence scheduling between the collection and its stores.
//!
//! # Responsibility
//! - Load the initial collection once per canvas session.
//! - Debounce saves so bursts of interaction produce one write.

pub mod debounce;
pub mod persistence;
