//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/list/search/update/delete over the `books` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `BookDraft::validate()` before SQL mutations.
//! - Read paths serve rows as stored; only undecodable rows are rejected.
//! - Listing and search order is insertion order (`id ASC`).
//! - Pagination bounds are the caller's responsibility.

use crate::db::DbError;
use crate::model::book::{Book, BookDraft, BookId, BookValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use thiserror::Error;

const BOOK_COLUMNS: &str = "id, title, author, year";
const REQUIRED_COLUMNS: [&str; 4] = ["id", "title", "author", "year"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] BookValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("book not found: {0}")]
    NotFound(BookId),
    #[error("invalid persisted book data: {0}")]
    InvalidData(String),
    #[error("required table `{0}` is missing; was the database bootstrapped?")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Optional filters for book search. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearch {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the author.
    pub author: Option<String>,
    /// Exact publication year.
    pub year: Option<i32>,
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Persists a new book and returns it with its assigned id.
    fn insert_book(&self, draft: &BookDraft) -> RepoResult<Book>;
    /// Gets one book by id.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Returns at most `limit` books starting at `offset`.
    fn list_books(&self, offset: i64, limit: i64) -> RepoResult<Vec<Book>>;
    /// Returns every book matching all supplied filters.
    fn search_books(&self, query: &BookSearch) -> RepoResult<Vec<Book>>;
    /// Replaces all mutable fields of an existing book.
    fn update_book(&self, id: BookId, draft: &BookDraft) -> RepoResult<Book>;
    /// Removes a book and returns the removed record.
    fn delete_book(&self, id: BookId) -> RepoResult<Book>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, draft: &BookDraft) -> RepoResult<Book> {
        draft.validate()?;

        let book = self.conn.query_row(
            &format!(
                "INSERT INTO books (title, author, year)
                 VALUES (?1, ?2, ?3)
                 RETURNING {BOOK_COLUMNS};"
            ),
            params![draft.title.as_str(), draft.author.as_str(), draft.year],
            read_book_row,
        )
        .map_err(decode_error)?;

        Ok(book)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1;"),
                [id],
                read_book_row,
            )
            .optional()
            .map_err(decode_error)?;

        Ok(book)
    }

    fn list_books(&self, offset: i64, limit: i64) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS}
             FROM books
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt.query_map(params![limit, offset], read_book_row)?;

        collect_books(rows)
    }

    fn search_books(&self, query: &BookSearch) -> RepoResult<Vec<Book>> {
        let mut sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = query.title.as_deref() {
            sql.push_str(" AND title LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(contains_pattern(title)));
        }

        if let Some(author) = query.author.as_deref() {
            sql.push_str(" AND author LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(contains_pattern(author)));
        }

        if let Some(year) = query.year {
            sql.push_str(" AND year = ?");
            bind_values.push(Value::Integer(i64::from(year)));
        }

        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), read_book_row)?;

        collect_books(rows)
    }

    fn update_book(&self, id: BookId, draft: &BookDraft) -> RepoResult<Book> {
        draft.validate()?;

        let book = self
            .conn
            .query_row(
                &format!(
                    "UPDATE books
                     SET
                        title = ?1,
                        author = ?2,
                        year = ?3
                     WHERE id = ?4
                     RETURNING {BOOK_COLUMNS};"
                ),
                params![draft.title.as_str(), draft.author.as_str(), draft.year, id],
                read_book_row,
            )
            .optional()
            .map_err(decode_error)?;

        book.ok_or(RepoError::NotFound(id))
    }

    fn delete_book(&self, id: BookId) -> RepoResult<Book> {
        let book = self
            .conn
            .query_row(
                &format!("DELETE FROM books WHERE id = ?1 RETURNING {BOOK_COLUMNS};"),
                [id],
                read_book_row,
            )
            .optional()
            .map_err(decode_error)?;

        book.ok_or(RepoError::NotFound(id))
    }
}

fn read_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        year: row.get("year")?,
    })
}

/// Maps column decoding failures to `InvalidData`; other errors stay `Db`.
fn decode_error(err: rusqlite::Error) -> RepoError {
    match err {
        rusqlite::Error::InvalidColumnType(_, column, kind) => {
            RepoError::InvalidData(format!("books.{column} holds unexpected {kind}"))
        }
        rusqlite::Error::IntegralValueOutOfRange(_, value) => {
            RepoError::InvalidData(format!("books.year out of integer range: {value}"))
        }
        rusqlite::Error::FromSqlConversionFailure(_, kind, source) => {
            RepoError::InvalidData(format!("cannot decode {kind} column: {source}"))
        }
        other => RepoError::from(other),
    }
}

fn collect_books(
    rows: impl Iterator<Item = rusqlite::Result<Book>>,
) -> RepoResult<Vec<Book>> {
    rows.map(|row| row.map_err(decode_error)).collect()
}

/// Builds a `LIKE` pattern matching `needle` literally anywhere in the value.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "books")? {
        return Err(RepoError::MissingRequiredTable("books"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "books", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_table_info(?1)
            WHERE name = ?2
        );",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
