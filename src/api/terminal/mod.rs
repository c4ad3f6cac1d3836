//! Terminal endpoints
//!
//! - `POST /execute`: dispatch one line against the shared session
//! - `GET /monitor`: resource snapshot (fallback snapshot when unavailable)
//! - `GET /autocomplete?q=`: up to ten completions

use super::AppState;
use axum::extract::{Extension, Query};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use cmdterm_core::{MonitoringSnapshot, Reply};
use serde::Deserialize;
use tracing::info;


/// Body of `POST /execute`
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub command: String,
}

/// Query of `GET /autocomplete`
#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: String,
}

async fn execute(
    Extension(state): Extension<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Json<Reply> {
    let mut session = state.session.lock().await;
    info!(session_id = %session.id(), command = %request.command, "Executing command");
    Json(state.dispatcher.execute(&mut session, &request.command).await)
}

async fn monitor(Extension(state): Extension<AppState>) -> Json<MonitoringSnapshot> {
    let session = state.session.lock().await;
    Json(state.dispatcher.monitor(&session).await)
}

async fn autocomplete(
    Extension(state): Extension<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Json<Vec<String>> {
    let session = state.session.lock().await;
    Json(state.dispatcher.autocomplete(&session, &query.q).await)
}

/// Create terminal routes
pub fn terminal_routes() -> Router {
    Router::new()
        .route("/execute", post(execute))
        .route("/monitor", get(monitor))
        .route("/autocomplete", get(autocomplete))
}
