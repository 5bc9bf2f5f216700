use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Book, CategoryKind, TopCategories},
    routes::required_param,
    services::recommendations,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuery {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesQuery {
    pub user_id: Option<String>,
}

/// Handler for similar-books recommendations
pub async fn similar(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    WithRejection(Query(query), _): WithRejection<Query<SimilarQuery>, AppError>,
) -> AppResult<Json<Vec<Book>>> {
    let user_id = required_param("userId", query.user_id)?;
    let kind: CategoryKind = required_param("type", query.kind)?.parse()?;
    let category = required_param("category", query.category)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        kind = %kind,
        category = %category,
        "Processing similar books request"
    );

    let books = recommendations::similar_books(
        state.catalog.clone(),
        state.reviews.clone(),
        &user_id,
        kind,
        &category,
    )
    .await?;

    Ok(Json(books))
}

/// Handler for top-categories recommendations
pub async fn categories(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    WithRejection(Query(query), _): WithRejection<Query<CategoriesQuery>, AppError>,
) -> AppResult<Json<TopCategories>> {
    let user_id = required_param("userId", query.user_id)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        "Processing top categories request"
    );

    let top =
        recommendations::top_categories(state.catalog.clone(), state.reviews.clone(), &user_id)
            .await?;

    Ok(Json(top))
}
