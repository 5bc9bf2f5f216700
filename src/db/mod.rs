pub mod postgres;
pub mod reviews;

pub use postgres::{create_pool, run_migrations};
pub use reviews::{InMemoryReviewStore, PgReviewStore, ReviewStore};
