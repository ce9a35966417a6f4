//! Core domain logic for the bookshelf catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::book::{Book, BookDraft, BookId, BookValidationError, YEAR_MAX, YEAR_MIN};
pub use repo::book_repo::{BookRepository, BookSearch, RepoError, RepoResult, SqliteBookRepository};
pub use service::book_service::{
    BookPage, BookService, ListBooksQuery, ServiceError, ServiceResult, DEFAULT_LIST_LIMIT,
    DEFAULT_LIST_OFFSET,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
