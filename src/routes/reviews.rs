use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{BookId, Review},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}

/// Which reviews to list
#[derive(Debug, PartialEq)]
enum ReviewFilter {
    User(String),
    Book(BookId),
}

impl TryFrom<ReviewQuery> for ReviewFilter {
    type Error = AppError;

    fn try_from(query: ReviewQuery) -> Result<Self, Self::Error> {
        let non_blank = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        match (non_blank(query.user_id), non_blank(query.book_id)) {
            (Some(user_id), None) => Ok(ReviewFilter::User(user_id)),
            (None, Some(book_id)) => Ok(ReviewFilter::Book(BookId::parse(&book_id)?)),
            (Some(_), Some(_)) => Err(AppError::InvalidInput(
                "Provide only one of userId or bookId".to_string(),
            )),
            (None, None) => Err(AppError::InvalidInput(
                "Missing required parameter: userId or bookId".to_string(),
            )),
        }
    }
}

/// Lists reviews for a user or a book
pub async fn list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    WithRejection(Query(query), _): WithRejection<Query<ReviewQuery>, AppError>,
) -> AppResult<Json<Vec<Review>>> {
    let filter = ReviewFilter::try_from(query)?;

    tracing::info!(
        request_id = %request_id,
        filter = ?filter,
        store = state.reviews.name(),
        "Processing review listing"
    );

    let reviews = match filter {
        ReviewFilter::User(user_id) => state.reviews.reviews_by_user(&user_id).await?,
        ReviewFilter::Book(book_id) => state.reviews.reviews_by_book(&book_id).await?,
    };

    Ok(Json(reviews))
}
