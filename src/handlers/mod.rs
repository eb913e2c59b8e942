//! HTTP handlers.
//!
//! POST   /persons      create (enriched from the name)
//! PUT    /persons      full replace by id
//! DELETE /persons/:id  delete by id
//! GET    /persons      filtered list, `limit` and `offset` in the query
//! GET    /health       database connectivity

pub mod health;
pub mod persons;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a JSON request body, telling an empty body apart from bad JSON.
/// A literal `null` decodes to `T::default()`.
pub(crate) fn decode_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        tracing::error!("request body is empty");
        return Err(ApiError::EmptyRequest);
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to decode request body");
            ApiError::Decode(e)
        })
}
