use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::ReviewStore,
    error::AppResult,
    models::{BookId, RatingSummary, Review},
};

/// Process-local review store
#[derive(Clone, Default)]
pub struct InMemoryReviewStore {
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with reviews
    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Arc::new(RwLock::new(reviews)),
        }
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Review>
    where
        F: Fn(&Review) -> bool,
    {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews.iter().filter(|r| predicate(*r)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait::async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>> {
        Ok(self.filtered(|r| r.user_id == user_id).await)
    }

    async fn reviews_by_book(&self, book_id: &BookId) -> AppResult<Vec<Review>> {
        Ok(self.filtered(|r| &r.book_id == book_id).await)
    }

    async fn reviews_by_user_min_rating(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<Review>> {
        Ok(self
            .filtered(|r| r.user_id == user_id && r.rating >= min_rating)
            .await)
    }

    async fn rating_summary(&self, book_id: &BookId) -> AppResult<Option<RatingSummary>> {
        let reviews = self.reviews.read().await;
        let ratings: Vec<i32> = reviews
            .iter()
            .filter(|r| &r.book_id == book_id)
            .map(|r| r.rating)
            .collect();

        if ratings.is_empty() {
            return Ok(None);
        }

        let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        Ok(Some(RatingSummary {
            average: total as f64 / ratings.len() as f64,
            count: ratings.len() as u32,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn review(id: &str, user: &str, book: &str, rating: i32, age_minutes: i64) -> Review {
        Review {
            id: id.to_string(),
            user_id: user.to_string(),
            book_id: BookId::parse(book).unwrap(),
            rating,
            text: String::new(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    fn store() -> InMemoryReviewStore {
        InMemoryReviewStore::with_reviews(vec![
            review("r1", "alice", "1", 9, 30),
            review("r2", "alice", "2", 4, 10),
            review("r3", "bob", "1", 6, 20),
            review("r4", "alice", "3", 7, 0),
        ])
    }

    #[tokio::test]
    async fn test_reviews_by_user_newest_first() {
        let reviews = store().reviews_by_user("alice").await.unwrap();
        let ids: Vec<&str> = reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r4", "r2", "r1"]);
    }

    #[tokio::test]
    async fn test_reviews_by_book() {
        let book = BookId::parse("1").unwrap();
        let reviews = store().reviews_by_book(&book).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.book_id == book));
    }

    #[tokio::test]
    async fn test_min_rating_is_inclusive() {
        let reviews = store()
            .reviews_by_user_min_rating("alice", 7)
            .await
            .unwrap();
        let ids: Vec<&str> = reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r4", "r1"]);
    }

    #[tokio::test]
    async fn test_rating_summary() {
        let store = store();

        let summary = store
            .rating_summary(&BookId::parse("1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.average - 7.5).abs() < f64::EPSILON);

        let missing = store
            .rating_summary(&BookId::parse("99").unwrap())
            .await
            .unwrap();
        assert_eq!(missing, None);
    }
}
