//! In-process store implementations.
//!
//! `InMemoryRemoteStore` stands in for the remote backend. It is constructed
//! explicitly and shared by `Arc`, never reached through a global.

use super::{LocalCache, RemoteNoteStore, StoreError, StoreResult};
use crate::model::note::Note;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Remote store emulation with optional latency and failure switches.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    notes: Mutex<Vec<Note>>,
    latency: Duration,
    fail_fetch: AtomicBool,
    fail_save: AtomicBool,
    save_attempts: AtomicUsize,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that delays every call by `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Store pre-populated with `notes`.
    pub fn seeded(notes: Vec<Note>) -> Self {
        Self {
            notes: Mutex::new(notes),
            ..Self::default()
        }
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    /// Number of `save_notes` calls, failed ones included.
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    /// Copy of the currently stored collection.
    pub fn snapshot(&self) -> StoreResult<Vec<Note>> {
        let notes = self
            .notes
            .lock()
            .map_err(|_| StoreError::Poisoned("remote notes"))?;
        Ok(notes.clone())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl RemoteNoteStore for InMemoryRemoteStore {
    async fn fetch_notes(&self) -> StoreResult<Vec<Note>> {
        self.simulate_latency().await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("fetch rejected".to_string()));
        }
        self.snapshot()
    }

    async fn save_notes(&self, notes: Vec<Note>) -> StoreResult<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save rejected".to_string()));
        }
        let mut stored = self
            .notes
            .lock()
            .map_err(|_| StoreError::Poisoned("remote notes"))?;
        *stored = notes;
        Ok(())
    }
}

/// Process-local key/value cache.
#[derive(Debug, Default)]
pub struct MemoryLocalCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryLocalCache {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Poisoned("local cache"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Poisoned("local cache"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
