use crate::{AppState, config::ServerConfig, error::ServerError, websocket};
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// The response structure for the health handler.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    connections: usize,
    started_at: String,
}

/// Builds the application router: the relay socket plus a health probe.
pub fn router(state: AppState) -> Router {
    // Any origin may connect.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(websocket::websocket_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.relay.peer_count().await,
        started_at: state.started_at.to_rfc3339(),
    })
}

/// Binds `config.bind_addr` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(ServerError::Bind)?;
    serve_listener(listener, AppState::new(), shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_listener(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    info!(
        "Server listening on {}",
        listener.local_addr().map_err(ServerError::Bind)?
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
