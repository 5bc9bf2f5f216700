use std::sync::Arc;

use crate::{config::Config, db::ReviewStore, services::catalog::CatalogProvider};

/// Settings for the session cookie and the routes it gates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub protected_prefixes: Vec<String>,
    pub login_path: String,
    pub secure_cookies: bool,
}

impl SessionConfig {
    /// Whether `path` falls under one of the protected prefixes
    ///
    /// Matching is per path segment: `/profile` covers `/profile` and
    /// `/profile/edit` but not `/profiles`. The login path is never protected,
    /// otherwise the redirect would loop.
    pub fn is_protected(&self, path: &str) -> bool {
        if path.trim_end_matches('/') == self.login_path.trim_end_matches('/') {
            return false;
        }

        self.protected_prefixes.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            if prefix.is_empty() {
                return true;
            }
            match path.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            cookie_name: config.session_cookie_name.clone(),
            protected_prefixes: config
                .protected_routes
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            login_path: config.login_path.clone(),
            secure_cookies: config.secure_cookies,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub reviews: Arc<dyn ReviewStore>,
    pub session: Arc<SessionConfig>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        reviews: Arc<dyn ReviewStore>,
        session: SessionConfig,
    ) -> Self {
        Self {
            catalog,
            reviews,
            session: Arc::new(session),
        }
    }
}
