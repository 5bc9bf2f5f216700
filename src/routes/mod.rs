use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware, require_session},
    state::AppState,
};

pub mod books;
pub mod recommendations;
pub mod reviews;
pub mod session;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(middleware::from_fn_with_state(state.clone(), require_session)),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(books::search))
        .route("/books/:id", get(books::detail))
        .route("/reviews", get(reviews::list))
        .route("/recommendations/similar", get(recommendations::similar))
        .route("/recommendations/categories", get(recommendations::categories))
        .route("/session", post(session::create).delete(session::destroy))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Unwraps a required query parameter, rejecting absent or blank values
pub(crate) fn required_param(name: &str, value: Option<String>) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required parameter: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_param_present() {
        assert_eq!(
            required_param("userId", Some(" abc ".to_string())).unwrap(),
            "abc"
        );
    }

    #[test]
    fn test_required_param_missing_or_blank() {
        assert!(matches!(
            required_param("userId", None),
            Err(AppError::InvalidInput(msg)) if msg == "Missing required parameter: userId"
        ));
        assert!(required_param("userId", Some("  ".to_string())).is_err());
    }
}
