//! HTTP Server module - REST API server implementation.
//!
//! This module provides the HTTP server, including routing, request
//! handling, and response formatting.

pub mod handlers;
pub mod response;
pub mod state;


use crate::config::Config;
use crate::error::{ManagerError, Result};
use axum::{
    extract::Request,
    http::StatusCode,
    routing::{any, get},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Creates the API router with all endpoints.
///
/// Request spans are parented to the span current at the time of the call,
/// so they inherit its fields even though connections run on other tasks.
pub fn create_router(state: Arc<AppState>) -> Router {
    let root = tracing::Span::current();
    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request| {
        tracing::info_span!(
            parent: &root,
            "request",
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    let middleware = ServiceBuilder::new()
        .layer(trace)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/services", get(handlers::list_services))
        // Method filtering happens in the handler so other verbs get a JSON 405.
        .route("/service", any(handlers::service_control))
        .layer(middleware)
        .with_state(state)
}

/// Starts the HTTP server and runs until SIGINT or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);
    state.manager.registry().check_paths();
    let router = create_router(state);

    let listener = bind(&config.bind_address, config.port).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Binds the listener. `host` may be an IP address or a hostname.
async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await.map_err(|e| {
        ManagerError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to bind to {}:{}: {}", host, port, e),
        ))
    })?;

    info!("Starting HTTP server on {}", listener.local_addr()?);

    Ok(listener)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
