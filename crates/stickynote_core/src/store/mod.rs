//! Storage capabilities for the note collection.
//!
//! # Responsibility
//! - Define the remote note-list store and local key/value cache contracts.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Both stores hold the whole collection as one unit (last write wins).
//! - The local cache stores the same JSON shape the remote store exchanges.

use crate::db::DbError;
use crate::model::note::{Note, NoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

pub mod memory;
pub mod sqlite_cache;

pub use memory::{InMemoryRemoteStore, MemoryLocalCache};
pub use sqlite_cache::SqliteLocalCache;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store implementation.
#[derive(Debug)]
pub enum StoreError {
    /// Backend could not be reached or refused the request.
    Unavailable(String),
    /// Local SQLite failure.
    Db(DbError),
    /// Collection could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Collection decoded but holds values the canvas cannot work with.
    Invalid(NoteValidationError),
    /// A store lock was poisoned by a panicking writer.
    Poisoned(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid note payload: {err}"),
            Self::Invalid(err) => write!(f, "invalid note collection: {err}"),
            Self::Poisoned(what) => write!(f, "store lock poisoned: {what}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::Unavailable(_) | Self::Poisoned(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Remote note-list store.
///
/// Fetch may legitimately return an empty list; that is not an error.
pub trait RemoteNoteStore: Send + Sync + 'static {
    fn fetch_notes(&self) -> impl Future<Output = StoreResult<Vec<Note>>> + Send;
    fn save_notes(&self, notes: Vec<Note>) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Local string key/value fallback cache.
pub trait LocalCache: Send + Sync + 'static {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Serializes a collection into the cache value format.
pub fn encode_notes(notes: &[Note]) -> StoreResult<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Parses a cache value back into a collection.
pub fn decode_notes(value: &str) -> StoreResult<Vec<Note>> {
    Ok(serde_json::from_str(value)?)
}
