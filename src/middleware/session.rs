use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::state::{AppState, SessionConfig};

/// Session cookie lifetime
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(5);

/// Builds the session cookie carrying `token`
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure_cookies)
        .max_age(SESSION_MAX_AGE)
        .build()
}

/// Builds a cookie that makes the browser drop the session cookie
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure_cookies)
        .build();
    cookie.make_removal();
    cookie
}

/// Gates protected path prefixes on the presence of the session cookie
///
/// The cookie value is not verified. Requests without it are redirected to
/// the login path and the cookie is cleared.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let session = state.session.as_ref();
    let path = request.uri().path().to_owned();

    if !session.is_protected(&path) {
        return next.run(request).await;
    }

    let has_session = jar
        .get(&session.cookie_name)
        .is_some_and(|cookie| !cookie.value().is_empty());

    if has_session {
        return next.run(request).await;
    }

    tracing::info!(
        path = %path,
        login_path = %session.login_path,
        "No session cookie, redirecting to login"
    );

    let jar = jar.add(removal_cookie(session));
    (jar, Redirect::temporary(&session.login_path)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure: bool) -> SessionConfig {
        SessionConfig {
            cookie_name: "session".to_string(),
            protected_prefixes: vec!["/profile".to_string()],
            login_path: "/login".to_string(),
            secure_cookies: secure,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&config(true), "token-123".to_string());
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "token-123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(5)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(&config(false));
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));

        let header = cookie.to_string();
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Path=/"));
    }
}
