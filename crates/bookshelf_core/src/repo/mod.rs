//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage gateway contract for books.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `BookDraft::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod book_repo;
