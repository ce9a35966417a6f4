//! Transport-agnostic request handlers for the bookshelf catalog.
//!
//! Any front end (CLI, HTTP adapter, test harness) builds an [`ApiRequest`],
//! hands it to [`BookApi::handle`] and relays the returned [`ApiResponse`].

pub mod api;

pub use api::{ApiRequest, ApiResponse, BookApi};
