//! SQLite-backed local cache.
//!
//! # Invariants
//! - One row per key; `set` replaces the previous value.
//! - The connection is only touched under the mutex, never across `.await`.

use super::{LocalCache, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key/value cache persisted in the `local_cache` table.
pub struct SqliteLocalCache {
    conn: Mutex<Connection>,
}

impl SqliteLocalCache {
    /// Opens (or creates) a cache database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Unix epoch milliseconds of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> StoreResult<Option<i64>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT updated_at FROM local_cache WHERE key = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite local cache"))
    }
}

impl LocalCache for SqliteLocalCache {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_cache WHERE key = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO local_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::SqliteLocalCache;
    use crate::store::LocalCache;

    #[test]
    fn set_replaces_previous_value() {
        let cache = SqliteLocalCache::open_in_memory().unwrap();
        assert_eq!(cache.get("notes").unwrap(), None);

        cache.set("notes", "[]").unwrap();
        cache.set("notes", "[1]").unwrap();
        assert_eq!(cache.get("notes").unwrap().as_deref(), Some("[1]"));
        assert!(cache.updated_at("notes").unwrap().is_some());
        assert_eq!(cache.get("other").unwrap(), None);
    }
}
