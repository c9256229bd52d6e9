//! Ordered schema steps for the local cache database.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// `(version, sql)` pairs; versions strictly increase.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_local_cache.sql"))];

/// Newest schema version this build can apply.
pub fn latest_schema_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_schema_version`] inside one transaction.
///
/// A database written by a newer build is rejected rather than downgraded.
pub(super) fn migrate(conn: &mut Connection) -> DbResult<()> {
    let on_disk: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_schema_version();
    if on_disk > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: latest,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > on_disk)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(())
}
