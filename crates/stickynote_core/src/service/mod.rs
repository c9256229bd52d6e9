//! Core use-case services.
//!
//! # Responsibility
//! - `board_service`: authoritative note collection and its mutations.
//! - `canvas_service`: gesture routing and save scheduling around a board.

pub mod board_service;
pub mod canvas_service;
