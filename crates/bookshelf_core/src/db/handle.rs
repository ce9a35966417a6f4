//! Process-scoped database handle.
//!
//! # Responsibility
//! - Own the single bootstrapped connection for the process lifetime.
//! - Hand out scoped connection guards, one per request.
//!
//! # Invariants
//! - A guard is released when it is dropped, whether the request succeeded,
//!   failed or panicked.
//! - Only bootstrapped connections are ever stored here.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Shared handle to the catalog database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (and bootstraps) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens (and bootstraps) a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Acquires the connection for one request.
    ///
    /// # Errors
    /// - `DbError::ConnectionPoisoned` when an earlier holder panicked.
    pub fn acquire(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::ConnectionPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::Database;

    #[test]
    fn acquire_returns_bootstrapped_connection() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.acquire().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn guard_is_released_after_scope() {
        let db = Database::open_in_memory().unwrap();
        {
            let conn = db.acquire().unwrap();
            conn.execute(
                "INSERT INTO books (title, author) VALUES ('a', 'b');",
                [],
            )
            .unwrap();
        }
        let conn = db.acquire().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
