use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookId;

/// Ratings at or above this value count as a positive review
pub const HIGH_RATING_THRESHOLD: i32 = 7;

/// A user's review of a book, owned by the review store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub book_id: BookId,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn is_high_rating(&self) -> bool {
        self.rating >= HIGH_RATING_THRESHOLD
    }
}
