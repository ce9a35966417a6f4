//! Book domain model.
//!
//! # Responsibility
//! - Define the persisted `Book` record (output representation).
//! - Define `BookDraft`, the create/replace payload, and its validation.
//!
//! # Invariants
//! - `id` is assigned by the store, never reused and never changed.
//! - Drafts carry a non-empty `title` and `author`; whitespace is kept as given.
//! - A draft `year`, when set, lies in `YEAR_MIN..=YEAR_MAX`.
//! - `Book` mirrors the stored row; bounds are enforced on writes only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned book identifier.
pub type BookId = i64;

/// Earliest accepted publication year.
pub const YEAR_MIN: i32 = 0;
/// Latest accepted publication year.
pub const YEAR_MAX: i32 = 2100;

/// Canonical persisted book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// `None` means the publication year is unknown.
    pub year: Option<i32>,
}

impl Book {
    /// Returns the mutable fields as a draft, e.g. to replay them elsewhere.
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
        }
    }
}

/// Create/replace payload. An update always carries all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<i32>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Checks field constraints before any persistence happens.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.author.is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        if let Some(year) = self.year {
            if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
                return Err(BookValidationError::YearOutOfRange(year));
            }
        }
        Ok(())
    }

    /// Attaches a store-assigned id.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("year must be between 0 and 2100, got {0}")]
    YearOutOfRange(i32),
}

impl BookValidationError {
    /// Name of the offending field, as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyAuthor => "author",
            Self::YearOutOfRange(_) => "year",
        }
    }
}
