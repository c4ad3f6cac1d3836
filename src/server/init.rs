//! Server initialization and run loop

use super::config::AppConfig;
use crate::api::{api_router, AppState};
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use cmdterm_core::{Dispatcher, Surface};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the full application router
pub fn build_app(config: &AppConfig) -> Router {
    let engine_config = config.engine_config().with_surface(Surface::Web);
    let profile = engine_config.profile;
    let state = AppState::new(Dispatcher::from_config(engine_config));

    let app = api_router(state)
        .route(
            "/",
            get(move || async move {
                format!(
                    "cmdterm {} ({:?} profile)\nPOST /execute, GET /monitor, GET /autocomplete?q=, GET /health\n",
                    env!("CARGO_PKG_VERSION"),
                    profile
                )
            }),
        )
        .layer(TraceLayer::new_for_http());

    if config.server.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Run the HTTP server until Ctrl-C or SIGTERM
pub async fn run(config: AppConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = build_app(&config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("cmdterm shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
