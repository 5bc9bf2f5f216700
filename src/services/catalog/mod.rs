//! Catalog provider abstraction
//!
//! The catalog is the external bibliographic data source. Search requests are
//! relayed unchanged; lookups by id or by category are decoded into [`Book`]s.

use crate::{
    error::AppResult,
    models::{Book, BookId, CatalogQuery, CategoryKind},
};

pub mod national_library;

pub use national_library::NationalLibraryCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Forwards a search to the catalog and returns the upstream JSON body as-is
    ///
    /// Non-2xx upstream statuses are surfaced as [`AppError::Upstream`](crate::error::AppError::Upstream).
    async fn search(&self, query: &CatalogQuery) -> AppResult<serde_json::Value>;

    /// Looks up a single book by its padded id
    ///
    /// Returns `Ok(None)` when the catalog reports 404 or an empty result.
    async fn get_book(&self, id: &BookId) -> AppResult<Option<Book>>;

    /// Lists books whose `kind` attribute matches `value`
    async fn books_by(&self, kind: CategoryKind, value: &str) -> AppResult<Vec<Book>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
