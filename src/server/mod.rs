//! HTTP front end: the explorer page plus the JSON API it talks to.

mod error;
pub mod routes;

use crate::config::settings::ExplorerSettings;
use crate::core::explorer::ExplorerEngine;
use crate::core::Dataset;
use crate::utils::error::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExplorerEngine<ExplorerSettings>>,
    pub datasets: Arc<Vec<Dataset>>,
}

impl AppState {
    pub fn new(engine: ExplorerEngine<ExplorerSettings>) -> Self {
        let datasets = engine.config().datasets();
        Self {
            engine: Arc::new(engine),
            datasets: Arc::new(datasets),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.engine.config().max_upload_bytes();

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/datasets", get(routes::datasets))
        .route("/api/load/url", post(routes::load_url))
        .route("/api/load/upload", post(routes::load_upload))
        .route("/api/sessions/{id}/columns", get(routes::columns))
        .route("/api/sessions/{id}/plot", get(routes::plot))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(settings: ExplorerSettings, monitor: bool, show: bool) -> Result<()> {
    let address = settings.bind_address();
    let engine = ExplorerEngine::new_with_monitoring(settings, monitor)?;
    let app = router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    let local = listener.local_addr()?;
    tracing::info!("Metadata explorer listening on http://{}", local);
    if show {
        println!("Open http://{}/ in your browser", local);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
