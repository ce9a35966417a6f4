//! Books schema bootstrap.
//!
//! Brings a catalog file to the schema this binary serves, tracked in
//! `PRAGMA user_version`. Today that is a single step creating `books`.
//!
//! # Invariants
//! - Bootstrap is additive: it never drops or rewrites stored books.
//! - A `books` table left by an earlier tool with `user_version = 0` is kept
//!   and stamped, since every step uses `IF NOT EXISTS`.
//! - A file stamped newer than this binary is refused untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema steps as `(user_version, sql)`, ascending.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_books.sql"))];

/// Returns the schema version this binary creates and serves.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to `latest_version()` in one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was stamped by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = stamped_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={latest} steps={}",
        pending.len()
    );
    Ok(())
}

fn stamped_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
