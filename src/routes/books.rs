use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Book, BookId, CatalogQuery, SearchField},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub field: Option<String>,
    pub since_id: Option<String>,
}

impl TryFrom<SearchParams> for CatalogQuery {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let field = params
            .field
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::parse::<SearchField>)
            .transpose()?;

        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|text| (field.unwrap_or(SearchField::Title), text));

        Ok(CatalogQuery {
            limit: params.limit,
            search,
            since_id: params
                .since_id
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

/// Relays a catalog search; the upstream body is returned unchanged
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> AppResult<Json<Value>> {
    let query = CatalogQuery::try_from(params)?;

    tracing::info!(
        request_id = %request_id,
        search = ?query.search,
        limit = ?query.limit,
        "Processing catalog search"
    );

    let body = state.catalog.search(&query).await?;
    Ok(Json(body))
}

/// Single book by id, with its rating aggregate when one exists
pub async fn detail(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = BookId::parse(&raw_id)?;

    tracing::info!(request_id = %request_id, book_id = %id, "Processing book lookup");

    let book = state
        .catalog
        .get_book(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    let summary = match state.reviews.rating_summary(&book.id).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(request_id = %request_id, book_id = %id, error = %e, "Rating lookup failed");
            None
        }
    };

    Ok(Json(book.with_rating(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(search: Option<&str>, field: Option<&str>) -> SearchParams {
        SearchParams {
            limit: Some(10),
            search: search.map(str::to_string),
            field: field.map(str::to_string),
            since_id: None,
        }
    }

    #[test]
    fn test_search_defaults_to_title_field() {
        let query = CatalogQuery::try_from(params(Some("Solaris"), None)).unwrap();
        assert_eq!(
            query.search,
            Some((SearchField::Title, "Solaris".to_string()))
        );
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_search_with_explicit_field() {
        let query = CatalogQuery::try_from(params(Some("Lem"), Some("author"))).unwrap();
        assert_eq!(query.search, Some((SearchField::Author, "Lem".to_string())));
    }

    #[test]
    fn test_field_without_search_text_is_ignored() {
        let query = CatalogQuery::try_from(params(None, Some("genre"))).unwrap();
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = CatalogQuery::try_from(params(Some("x"), Some("isbn")));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
