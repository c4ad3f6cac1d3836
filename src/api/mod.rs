//! Web API module for cmdterm
//!
//! Provides REST API endpoints for:
//! - Command execution against the shared session
//! - Monitoring snapshots
//! - Autocomplete suggestions
//! - Health checks

pub mod health;
pub mod terminal;

use axum::{Extension, Router};
use cmdterm_core::{Dispatcher, Session};
use std::sync::Arc;
use tokio::sync::Mutex;

pub use health::health_routes;
pub use terminal::terminal_routes;

/// State shared by every request.
///
/// There is exactly one session for the whole server. Requests take the lock
/// for the duration of a command, so they are serialised through the engine.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    /// Wrap an engine and start its long-lived session
    pub fn new(dispatcher: Dispatcher) -> Self {
        let session = dispatcher.new_session();
        Self {
            dispatcher: Arc::new(dispatcher),
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Create the API router with all endpoints
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(terminal_routes())
        .layer(Extension(state))
}
