//! Handler error type and its HTTP rendering.
//!
//! Client errors keep their specific message. Everything that went wrong
//! downstream (store, enrichment) becomes `Internal`, rendered as the bare
//! "internal error"; the cause is logged where it happened.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    Json,
};
use thiserror::Error;

use crate::response::{Response, ValidationErrorResponse};
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("empty request")]
    EmptyRequest,

    #[error("failed to decode request")]
    Decode(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Unparseable path or query parameter; carries the client-facing message.
    #[error("{0}")]
    InvalidParam(&'static str),

    #[error("request timed out")]
    Timeout,

    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Log `err` under `context` in the current span and collapse it.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "{}", context);
        Self::Internal
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyRequest | Self::Decode(_) | Self::Validation(_) | Self::InvalidParam(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let status = self.status_code();
        match &self {
            Self::Validation(errs) => {
                (status, Json(ValidationErrorResponse::from(errs))).into_response()
            }
            _ => (status, Json(Response::error(self.to_string()))).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
