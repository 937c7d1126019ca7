use std::{env, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod notify;
mod routes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::request_log::request_log,
    routes::{
        key_status::key_status_route::key_status_route, ping::ping_route::ping_route,
        solve::solve_route::solve_route, solve_batch::solve_batch_route::solve_batch_route,
    },
};

/// Pages arrive as whole raw documents, so the body limit is generous.
const BODY_LIMIT_BYTES: usize = 200 * 1024 * 1024;

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".into());

    let state = Arc::new(AppState::from_env()?);

    let app = Router::new()
        .route("/ping", get(ping_route))
        .route("/solve", post(solve_route))
        .route("/solve/batch", post(solve_batch_route))
        .route("/key_status", get(key_status_route))
        .layer(middleware::from_fn(request_log))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");
    notify::notify("Quiz backend", &format!("Listening on {host_url}"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
