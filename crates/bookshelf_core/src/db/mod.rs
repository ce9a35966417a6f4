//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the catalog.
//! - Ensure the `books` table exists before any repository touches it.
//! - Hand out per-request connection guards from one process-scoped handle.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write catalog data before bootstrap succeeds.
//! - Bootstrap never drops or rewrites existing rows.

use thiserror::Error;

mod handle;
pub mod migrations;
mod open;

pub use handle::Database;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("database connection lock poisoned by a panicked request")]
    ConnectionPoisoned,
}
