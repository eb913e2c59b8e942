//! GET /health: reports whether the database answers.

use axum::{extract::State, http::StatusCode, Json};

use crate::response::Response;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Response>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(Response::ok())),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Response::error("database unavailable")),
            )
        }
    }
}
