//! Router construction for the person server.

use std::any::Any;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware as axum_mw,
    response::{IntoResponse, Response as HttpResponse},
    routing::{delete, get, post},
    BoxError, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers;
use crate::middleware::request_id::request_id;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route(
            "/persons",
            post(handlers::persons::create_person)
                .put(handlers::persons::update_person)
                .get(handlers::persons::list_persons),
        )
        .route("/persons/:id", delete(handlers::persons::delete_person))
        .route("/health", get(handlers::health::health))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> HttpResponse {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = message, "handler panicked");
    ApiError::Internal.into_response()
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("request timed out");
        ApiError::Timeout
    } else {
        ApiError::internal("middleware failed", err)
    }
}
