//! HTTP gateway of the FAQ assistant.
//!
//! Routes:
//! - `GET  /`                 → static UI page
//! - `POST /ask`              → answer a question from the knowledge base
//! - `POST /admin/update_kb`  → replace the knowledge base
//! - `GET  /admin/logs`       → list logged exchanges
//!
//! Admin routes carry no access control.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;


use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, config::ApiConfig},
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::{
        admin::{logs_route::logs_route, update_kb_route::update_kb_route},
        ask::ask_route::ask_route,
        home_route::home_route,
    },
};

/// Builds the router over an already initialized state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_route))
        .route("/ask", post(ask_route))
        .route("/admin/update_kb", post(update_kb_route))
        .route("/admin/logs", get(logs_route))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Opens the stores, binds `cfg.address` and serves until Ctrl+C.
pub async fn start(cfg: ApiConfig) -> AppResult<()> {
    let state = Arc::new(AppState::init(&cfg).await?);
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, "FAQ assistant listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
