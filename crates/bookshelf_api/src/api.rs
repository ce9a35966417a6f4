//! Use-case handlers for catalog operations.
//!
//! # Responsibility
//! - Decode wire payloads into `BookDraft` and request parameters.
//! - Run one service call per request over a scoped connection guard.
//! - Map outcomes onto HTTP-style status codes and JSON bodies.
//!
//! # Invariants
//! - Handlers never panic on bad input; every failure becomes a response.
//! - The connection guard is dropped before the response is returned.
//! - Error bodies always carry `detail`; validation errors add `field`.

use bookshelf_core::{
    Book, BookDraft, BookId, BookSearch, BookService, Database, ListBooksQuery, RepoError,
    ServiceError, ServiceResult, SqliteBookRepository,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// One addressable catalog operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ApiRequest {
    Healthcheck,
    CreateBook {
        payload: Value,
    },
    GetBook {
        id: BookId,
    },
    ListBooks {
        #[serde(default)]
        offset: Option<i64>,
        #[serde(default)]
        limit: Option<i64>,
    },
    SearchBooks {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        year: Option<i32>,
    },
    UpdateBook {
        id: BookId,
        payload: Value,
    },
    DeleteBook {
        id: BookId,
    },
}

impl ApiRequest {
    /// Operation name used in logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Healthcheck => "healthcheck",
            Self::CreateBook { .. } => "create_book",
            Self::GetBook { .. } => "get_book",
            Self::ListBooks { .. } => "list_books",
            Self::SearchBooks { .. } => "search_books",
            Self::UpdateBook { .. } => "update_book",
            Self::DeleteBook { .. } => "delete_book",
        }
    }
}

/// Response envelope: status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn book(status: u16, book: &Book) -> Self {
        Self::new(status, json!(book))
    }

    fn books(books: &[Book]) -> Self {
        Self::new(STATUS_OK, json!(books))
    }

    fn unprocessable(detail: impl Into<String>, field: Option<&str>) -> Self {
        let mut body = json!({ "detail": detail.into() });
        if let Some(field) = field {
            body["field"] = json!(field);
        }
        Self::new(STATUS_UNPROCESSABLE, body)
    }

    fn from_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::Validation(_) | ServiceError::InvalidRequest { .. } => {
                Self::unprocessable(err.to_string(), err.field())
            }
            ServiceError::NotFound(_) => {
                Self::new(STATUS_NOT_FOUND, json!({ "detail": "Book not found" }))
            }
            ServiceError::Storage(_) => Self::new(
                STATUS_INTERNAL_ERROR,
                json!({ "detail": err.to_string() }),
            ),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Catalog request handlers over one process-scoped database handle.
pub struct BookApi {
    db: Database,
}

impl BookApi {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Dispatches one request to its handler.
    pub fn handle(&self, request: ApiRequest) -> ApiResponse {
        let operation = request.operation();
        let response = match request {
            ApiRequest::Healthcheck => self.healthcheck(),
            ApiRequest::CreateBook { payload } => self.create_book(payload),
            ApiRequest::GetBook { id } => self.get_book(id),
            ApiRequest::ListBooks { offset, limit } => self.list_books(offset, limit),
            ApiRequest::SearchBooks {
                title,
                author,
                year,
            } => self.search_books(BookSearch {
                title,
                author,
                year,
            }),
            ApiRequest::UpdateBook { id, payload } => self.update_book(id, payload),
            ApiRequest::DeleteBook { id } => self.delete_book(id),
        };
        debug!(
            "event=api_request module=api op={} status={}",
            operation, response.status
        );
        response
    }

    /// Liveness probe. Does not touch the database.
    pub fn healthcheck(&self) -> ApiResponse {
        ApiResponse::new(STATUS_OK, json!({ "status": "ok" }))
    }

    pub fn create_book(&self, payload: Value) -> ApiResponse {
        let draft = match decode_draft(payload) {
            Ok(draft) => draft,
            Err(response) => return response,
        };
        match self.with_book_service(|service| service.create_book(&draft)) {
            Ok(book) => ApiResponse::book(STATUS_CREATED, &book),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    pub fn get_book(&self, id: BookId) -> ApiResponse {
        match self.with_book_service(|service| service.get_book(id)) {
            Ok(book) => ApiResponse::book(STATUS_OK, &book),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    /// Lists one page; `None` bounds fall back to offset 0 / limit 10.
    pub fn list_books(&self, offset: Option<i64>, limit: Option<i64>) -> ApiResponse {
        let query = ListBooksQuery { offset, limit };
        match self.with_book_service(|service| service.list_books(&query)) {
            Ok(page) => ApiResponse::books(&page.items),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    pub fn search_books(&self, query: BookSearch) -> ApiResponse {
        match self.with_book_service(|service| service.search_books(&query)) {
            Ok(books) => ApiResponse::books(&books),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    /// Replaces every mutable field of book `id` with the payload.
    pub fn update_book(&self, id: BookId, payload: Value) -> ApiResponse {
        let draft = match decode_draft(payload) {
            Ok(draft) => draft,
            Err(response) => return response,
        };
        match self.with_book_service(|service| service.update_book(id, &draft)) {
            Ok(book) => ApiResponse::book(STATUS_OK, &book),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    pub fn delete_book(&self, id: BookId) -> ApiResponse {
        match self.with_book_service(|service| service.delete_book(id)) {
            Ok(book) => ApiResponse::book(STATUS_OK, &book),
            Err(err) => ApiResponse::from_error(&err),
        }
    }

    fn with_book_service<T>(
        &self,
        f: impl FnOnce(&BookService<SqliteBookRepository<'_>>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let conn = self
            .db
            .acquire()
            .map_err(|err| ServiceError::Storage(RepoError::Db(err)))?;
        let repo = SqliteBookRepository::try_new(&conn)?;
        let service = BookService::new(repo);
        f(&service)
    }
}

fn decode_draft(payload: Value) -> Result<BookDraft, ApiResponse> {
    serde_json::from_value(payload).map_err(|err| {
        debug!("event=api_decode module=api status=rejected error_code=invalid_payload");
        ApiResponse::unprocessable(format!("invalid book payload: {err}"), None)
    })
}
