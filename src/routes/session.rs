use axum::{extract::State, Json};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::session::{removal_cookie, session_cookie},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

/// Stores the client's opaque token in the session cookie
pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<SessionRequest>, AppError>,
) -> AppResult<(CookieJar, Json<Value>)> {
    let token = request.token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("Missing session token".to_string()));
    }

    tracing::info!(cookie = %state.session.cookie_name, "Session created");

    let jar = jar.add(session_cookie(&state.session, token.to_string()));
    Ok((jar, Json(json!({ "status": "ok" }))))
}

/// Clears the session cookie
pub async fn destroy(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    tracing::info!(cookie = %state.session.cookie_name, "Session cleared");

    let jar = jar.add(removal_cookie(&state.session));
    (jar, Json(json!({ "status": "ok" })))
}
