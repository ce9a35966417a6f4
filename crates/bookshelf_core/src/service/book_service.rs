//! Book use-case service.
//!
//! # Responsibility
//! - Provide the catalog operations: create, get, list, search, update, delete.
//! - Enforce request-level preconditions (id and pagination bounds).
//! - Translate repository errors into the catalog error taxonomy.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - `update_book` uses full replacement semantics; nothing is merged.
//! - Validation failures happen before any SQL mutation.
//! - Log lines carry ids and counts only, never titles or authors.

use crate::model::book::{Book, BookDraft, BookId, BookValidationError};
use crate::repo::book_repo::{BookRepository, BookSearch, RepoError};
use log::{debug, error, info, warn};
use std::time::Instant;
use thiserror::Error;

/// Offset applied when a list request leaves it unset.
pub const DEFAULT_LIST_OFFSET: i64 = 0;
/// Page size applied when a list request leaves it unset.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Book payload fails field constraints.
    #[error(transparent)]
    Validation(#[from] BookValidationError),
    /// Request parameter outside its accepted range.
    #[error("invalid {field}: {message}")]
    InvalidRequest {
        field: &'static str,
        message: String,
    },
    /// Target book does not exist.
    #[error("book not found: {0}")]
    NotFound(BookId),
    /// Persistence-layer failure.
    #[error("storage failure: {0}")]
    Storage(#[source] RepoError),
}

impl ServiceError {
    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::InvalidRequest { .. } => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_failed",
        }
    }

    /// Offending field name for validation outcomes.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.field()),
            Self::InvalidRequest { field, .. } => Some(*field),
            Self::NotFound(_) | Self::Storage(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// Pagination input for listing books. `None` selects the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListBooksQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// One page of books plus the bounds actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    /// Books in insertion order.
    pub items: Vec<Book>,
    pub offset: i64,
    pub limit: i64,
}

/// Book service facade over repository implementations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new book.
    pub fn create_book(&self, draft: &BookDraft) -> ServiceResult<Book> {
        let started_at = Instant::now();
        let result = draft
            .validate()
            .map_err(ServiceError::from)
            .and_then(|()| self.repo.insert_book(draft).map_err(ServiceError::from));
        log_outcome("book_create", started_at, &result, |book| {
            format!("book_id={}", book.id)
        });
        result
    }

    /// Gets one book by id.
    pub fn get_book(&self, id: BookId) -> ServiceResult<Book> {
        let started_at = Instant::now();
        let result = ensure_valid_id(id).and_then(|()| {
            self.repo
                .get_book(id)?
                .ok_or(ServiceError::NotFound(id))
        });
        log_outcome("book_get", started_at, &result, |book| {
            format!("book_id={}", book.id)
        });
        result
    }

    /// Lists one page of books in insertion order.
    ///
    /// # Contract
    /// - `offset` defaults to 0 and must be `>= 0`.
    /// - `limit` defaults to 10 and must be `>= 1`.
    pub fn list_books(&self, query: &ListBooksQuery) -> ServiceResult<BookPage> {
        let started_at = Instant::now();
        let result = resolve_page_bounds(query).and_then(|(offset, limit)| {
            let items = self.repo.list_books(offset, limit)?;
            Ok(BookPage {
                items,
                offset,
                limit,
            })
        });
        log_outcome("book_list", started_at, &result, |page| {
            format!(
                "offset={} limit={} count={}",
                page.offset,
                page.limit,
                page.items.len()
            )
        });
        result
    }

    /// Searches books by any subset of title, author and year.
    ///
    /// Empty text filters are treated as absent; no filters returns every book.
    /// Non-empty filters match literally, surrounding whitespace included.
    pub fn search_books(&self, query: &BookSearch) -> ServiceResult<Vec<Book>> {
        let started_at = Instant::now();
        let normalized = normalize_search(query);
        let result = self
            .repo
            .search_books(&normalized)
            .map_err(ServiceError::from);
        log_outcome("book_search", started_at, &result, |books| {
            format!(
                "has_title={} has_author={} has_year={} count={}",
                normalized.title.is_some(),
                normalized.author.is_some(),
                normalized.year.is_some(),
                books.len()
            )
        });
        result
    }

    /// Replaces title, author and year of an existing book.
    pub fn update_book(&self, id: BookId, draft: &BookDraft) -> ServiceResult<Book> {
        let started_at = Instant::now();
        let result = ensure_valid_id(id)
            .and_then(|()| draft.validate().map_err(ServiceError::from))
            .and_then(|()| self.repo.update_book(id, draft).map_err(ServiceError::from));
        log_outcome("book_update", started_at, &result, |book| {
            format!("book_id={}", book.id)
        });
        result
    }

    /// Deletes a book and returns the removed record.
    pub fn delete_book(&self, id: BookId) -> ServiceResult<Book> {
        let started_at = Instant::now();
        let result =
            ensure_valid_id(id).and_then(|()| self.repo.delete_book(id).map_err(ServiceError::from));
        log_outcome("book_delete", started_at, &result, |book| {
            format!("book_id={}", book.id)
        });
        result
    }
}

fn ensure_valid_id(id: BookId) -> ServiceResult<()> {
    if id < 1 {
        return Err(ServiceError::InvalidRequest {
            field: "id",
            message: format!("must be >= 1, got {id}"),
        });
    }
    Ok(())
}

/// Applies list defaults and checks bounds.
pub fn resolve_page_bounds(query: &ListBooksQuery) -> ServiceResult<(i64, i64)> {
    let offset = query.offset.unwrap_or(DEFAULT_LIST_OFFSET);
    if offset < 0 {
        return Err(ServiceError::InvalidRequest {
            field: "offset",
            message: format!("must be >= 0, got {offset}"),
        });
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 1 {
        return Err(ServiceError::InvalidRequest {
            field: "limit",
            message: format!("must be >= 1, got {limit}"),
        });
    }

    Ok((offset, limit))
}

fn normalize_search(query: &BookSearch) -> BookSearch {
    BookSearch {
        title: non_empty(query.title.as_deref()),
        author: non_empty(query.author.as_deref()),
        year: query.year,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    result: &ServiceResult<T>,
    describe: impl FnOnce(&T) -> String,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok duration_ms={duration_ms} {}",
            describe(value)
        ),
        Err(ServiceError::Storage(err)) => error!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code=storage_failed error={err}"
        ),
        Err(ServiceError::NotFound(id)) => debug!(
            "event={event} module=service status=miss duration_ms={duration_ms} error_code=not_found book_id={id}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected duration_ms={duration_ms} error_code={} field={}",
            err.code(),
            err.field().unwrap_or("-")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_search, resolve_page_bounds, ListBooksQuery, ServiceError};
    use crate::repo::book_repo::BookSearch;

    #[test]
    fn page_bounds_apply_defaults() {
        assert_eq!(
            resolve_page_bounds(&ListBooksQuery::default()).unwrap(),
            (0, 10)
        );
    }

    #[test]
    fn page_bounds_reject_negative_offset_and_zero_limit() {
        let err = resolve_page_bounds(&ListBooksQuery {
            offset: Some(-1),
            limit: None,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("offset"));

        let err = resolve_page_bounds(&ListBooksQuery {
            offset: None,
            limit: Some(0),
        })
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest { field: "limit", .. }));
    }

    #[test]
    fn page_bounds_pass_large_values_through() {
        let bounds = resolve_page_bounds(&ListBooksQuery {
            offset: Some(i64::MAX),
            limit: Some(i64::MAX),
        })
        .unwrap();
        assert_eq!(bounds, (i64::MAX, i64::MAX));
    }

    #[test]
    fn only_empty_text_filters_are_dropped() {
        let normalized = normalize_search(&BookSearch {
            title: Some(String::new()),
            author: Some(" Herbert ".to_string()),
            year: Some(0),
        });
        assert_eq!(normalized.title, None);
        assert_eq!(normalized.author.as_deref(), Some(" Herbert "));
        assert_eq!(normalized.year, Some(0));
    }
}
