use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use bookshelf_api::{
    config::{Config, ReviewStoreBackend},
    create_router,
    db::{self, InMemoryReviewStore, PgReviewStore, ReviewStore},
    services::NationalLibraryCatalog,
    AppState, SessionConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let reviews: Arc<dyn ReviewStore> = match config.review_store {
        ReviewStoreBackend::Postgres => {
            let pool = db::create_pool(&config.database_url)
                .await
                .context("Failed to connect to database")?;
            db::run_migrations(&pool).await?;
            Arc::new(PgReviewStore::new(pool))
        }
        ReviewStoreBackend::Memory => {
            tracing::warn!("Using in-memory review store; reviews are not persisted");
            Arc::new(InMemoryReviewStore::new())
        }
    };

    let catalog = Arc::new(NationalLibraryCatalog::new(config.catalog_api_url.clone()));
    let state = AppState::new(catalog, reviews, SessionConfig::from(&config));

    let app = create_router(state).layer(cors_layer(&config)?);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        catalog = %config.catalog_api_url,
        review_store = ?config.review_store,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match &config.cors_origins {
        None => Ok(layer.allow_origin(Any)),
        Some(origins) => {
            let origins = origins
                .iter()
                .map(|o| HeaderValue::from_str(o.trim()))
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid CORS origin")?;
            Ok(layer.allow_origin(origins))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
