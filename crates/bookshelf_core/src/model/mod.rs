//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical in-memory book record and its write payload.
//! - Own field-level validation rules shared by every write path.
//!
//! # Invariants
//! - Every persisted book is identified by a store-assigned `BookId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod book;
