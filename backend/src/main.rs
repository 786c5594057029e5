use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod store;
mod validation;


use crate::config::Config;
use crate::store::ItemStore;

/// Shared application state — cheap to clone (the store sits behind an Arc).
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<RwLock<ItemStore>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(ItemStore::new())),
        }
    }

    /// Drops every stored item. Used to isolate independent test runs.
    #[allow(dead_code)]
    pub async fn reset(&self) {
        self.items.write().await.reset();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,mock_inventory_api=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let app = build_router(AppState::new(), config.max_body_bytes);

    let addr = config.addr();
    info!("Mock inventory API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Items ───────────────────────────────────────────────────────────
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route("/items/:index", put(handlers::items::update_item))

        // ── Fault injection ─────────────────────────────────────────────────
        .route("/simulate-error", get(handlers::simulate_error))

        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
