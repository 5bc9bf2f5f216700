use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    db::ReviewStore,
    error::{AppError, AppResult},
    models::{BookId, RatingSummary, Review},
};

/// Review store backed by the `reviews` table
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: String,
    user_id: String,
    book_id: String,
    rating: i32,
    text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = AppError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let book_id = BookId::parse(&row.book_id).map_err(|_| {
            AppError::Internal(format!(
                "Review {} has malformed book id {:?}",
                row.id, row.book_id
            ))
        })?;

        Ok(Review {
            id: row.id,
            user_id: row.user_id,
            book_id,
            rating: row.rating,
            text: row.text,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    average: Option<f64>,
    count: i64,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_reviews(rows: Vec<ReviewRow>) -> AppResult<Vec<Review>> {
        rows.into_iter().map(Review::try_from).collect()
    }
}

#[async_trait::async_trait]
impl ReviewStore for PgReviewStore {
    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, user_id, book_id, rating, text, created_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, count = rows.len(), "Fetched reviews by user");

        Self::into_reviews(rows)
    }

    async fn reviews_by_book(&self, book_id: &BookId) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, user_id, book_id, rating, text, created_at
            FROM reviews
            WHERE book_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(book_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(book_id = %book_id, count = rows.len(), "Fetched reviews by book");

        Self::into_reviews(rows)
    }

    async fn reviews_by_user_min_rating(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, user_id, book_id, rating, text, created_at
            FROM reviews
            WHERE user_id = $1 AND rating >= $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(min_rating)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            user_id = %user_id,
            min_rating,
            count = rows.len(),
            "Fetched rated reviews by user"
        );

        Self::into_reviews(rows)
    }

    async fn rating_summary(&self, book_id: &BookId) -> AppResult<Option<RatingSummary>> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT AVG(rating)::FLOAT8 AS average, COUNT(*) AS count
            FROM reviews
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(match row.average {
            Some(average) if row.count > 0 => Some(RatingSummary {
                average,
                count: u32::try_from(row.count).unwrap_or(u32::MAX),
            }),
            _ => None,
        })
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(book_id: &str) -> ReviewRow {
        ReviewRow {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            book_id: book_id.to_string(),
            rating: 9,
            text: "Świetna".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion_keeps_padded_id() {
        let review = Review::try_from(row("00000000000321")).unwrap();
        assert_eq!(review.book_id.as_str(), "00000000000321");
        assert_eq!(review.rating, 9);
    }

    #[test]
    fn test_row_conversion_pads_short_id() {
        let review = Review::try_from(row("321")).unwrap();
        assert_eq!(review.book_id.as_str(), "00000000000321");
    }

    #[test]
    fn test_row_conversion_rejects_malformed_id() {
        let result = Review::try_from(row("abc"));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
