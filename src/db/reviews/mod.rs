//! Review store abstraction
//!
//! Reviews are owned by an external document store; this service only reads
//! them. Every query is an equality filter on the user or book id, optionally
//! combined with a minimum rating.

use crate::{
    error::AppResult,
    models::{BookId, RatingSummary, Review},
};

mod memory;
mod postgres;

pub use memory::InMemoryReviewStore;
pub use postgres::PgReviewStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    /// All reviews written by a user
    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>>;

    /// All reviews of a book
    async fn reviews_by_book(&self, book_id: &BookId) -> AppResult<Vec<Review>>;

    /// Reviews written by a user with `rating >= min_rating`
    async fn reviews_by_user_min_rating(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<Review>>;

    /// Average rating and review count for a book, `None` if it has no reviews
    async fn rating_summary(&self, book_id: &BookId) -> AppResult<Option<RatingSummary>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
