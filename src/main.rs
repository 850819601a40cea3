use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;
mod serialize;

use crate::config::Config;
use crate::db::{DocumentStore, PgDocumentStore};
use crate::error::{AppError, AppResult};

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no database was configured or reachable at startup.
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl AppState {
    pub fn store(&self) -> AppResult<&dyn DocumentStore> {
        self.store.as_deref().ok_or(AppError::StorageUnavailable)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,athletic_store=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Athletic Store API v{}", env!("CARGO_PKG_VERSION"));

    let store = connect_store(&config).await;
    let state = AppState { store };

    seed::ensure_seeded(state.store.as_deref()).await;

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Opens the document store, or runs without one when it is unset or unreachable.
async fn connect_store(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; product endpoints will report the database as unconfigured");
        return None;
    };

    match PgDocumentStore::connect(url, config.database_name.clone()).await {
        Ok(store) => {
            info!(database = store.name(), "Document store ready");
            Some(Arc::new(store))
        }
        Err(err) => {
            warn!(error = %err, "Could not open document store; continuing without it");
            None
        }
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Liveness ────────────────────────────────────────────────────────
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route("/test", get(handlers::diagnostics::test_database))

        // ── Products ────────────────────────────────────────────────────────
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )

        // ── Seed ────────────────────────────────────────────────────────────
        .route("/api/seed", post(handlers::seed::seed_data))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
