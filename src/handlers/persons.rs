//! Person handlers.
//!
//! Each handler is one linear pass: decode, validate, call the enrichment
//! client and/or the store, render the envelope. Work happens inside a span
//! tagged with the operation and request id.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    Json,
};
use serde::Deserialize;
use tracing::Instrument;

use super::decode_json;
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id::RequestContext;
use crate::models::{Filters, NewPerson, Person};
use crate::response::{CreatePersonResponse, ListPersonsResponse, Response};
use crate::state::AppState;
use crate::validation::{Validate, ValidationErrors, Validator};

/// Body of POST /persons
#[derive(Debug, Default, Deserialize)]
pub struct CreatePersonRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
}

impl Validate for CreatePersonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required_str("name", self.name.as_deref())
            .required_str("surname", self.surname.as_deref())
            .finish()
    }
}

/// Body of PUT /persons: the complete replacement record.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePersonRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub country: Option<String>,
}

impl Validate for UpdatePersonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("id", self.id.as_ref())
            .required_str("name", self.name.as_deref())
            .required_str("surname", self.surname.as_deref())
            .required("age", self.age.as_ref())
            .required_str("gender", self.gender.as_deref())
            .required_str("country", self.country.as_deref())
            .finish()
    }
}

impl UpdatePersonRequest {
    /// Only meaningful after `validate()` has passed.
    fn into_person(self) -> Person {
        Person {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            patronymic: non_blank(self.patronymic),
            age: self.age.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validated<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(|e| {
        tracing::error!(error = %e, "invalid request");
        ApiError::Validation(e)
    })
}

/// POST /persons
pub async fn create_person(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> ApiResult<Json<CreatePersonResponse>> {
    create(&state, &body)
        .instrument(ctx.span("handlers.person.create"))
        .await
}

async fn create(state: &AppState, body: &[u8]) -> ApiResult<Json<CreatePersonResponse>> {
    let req: CreatePersonRequest = decode_json(body)?;
    tracing::info!(request = ?req, "request body decoded");
    validated(&req)?;

    let name = req.name.unwrap_or_default();
    let enrichment = state
        .enricher
        .enrich(&name)
        .await
        .map_err(|e| ApiError::internal("failed to enrich person", e))?;

    let person = NewPerson {
        name,
        surname: req.surname.unwrap_or_default(),
        patronymic: non_blank(req.patronymic),
        age: enrichment.age,
        gender: enrichment.gender,
        country: enrichment.country,
    };

    let id = state
        .store
        .create(&person)
        .await
        .map_err(|e| ApiError::internal("failed to save person", e))?;

    tracing::info!(id, "person added");
    Ok(Json(CreatePersonResponse::new(id)))
}

/// PUT /persons
pub async fn update_person(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> ApiResult<Json<Response>> {
    update(&state, &body)
        .instrument(ctx.span("handlers.person.update"))
        .await
}

async fn update(state: &AppState, body: &[u8]) -> ApiResult<Json<Response>> {
    let req: UpdatePersonRequest = decode_json(body)?;
    tracing::info!(request = ?req, "request body decoded");
    validated(&req)?;
    let person = req.into_person();

    state
        .store
        .update(&person)
        .await
        .map_err(|e| ApiError::internal("failed to update person", e))?;

    tracing::info!(id = person.id, "person updated");
    Ok(Json(Response::ok()))
}

/// DELETE /persons/:id
pub async fn delete_person(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Response>> {
    delete(&state, &id)
        .instrument(ctx.span("handlers.person.delete"))
        .await
}

async fn delete(state: &AppState, raw_id: &str) -> ApiResult<Json<Response>> {
    let id: i64 = raw_id.parse().map_err(|e| {
        tracing::error!(error = %e, id = raw_id, "failed to parse person id");
        ApiError::InvalidParam("invalid ID format")
    })?;

    state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::internal("failed to delete person", e))?;

    tracing::info!(id, "person deleted");
    Ok(Json(Response::ok()))
}

/// GET /persons?limit=&offset=
pub async fn list_persons(
    State(state): State<AppState>,
    ctx: RequestContext,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Json<ListPersonsResponse>> {
    list(&state, query.as_deref(), &body)
        .instrument(ctx.span("handlers.person.list"))
        .await
}

async fn list(
    state: &AppState,
    query: Option<&str>,
    body: &[u8],
) -> ApiResult<Json<ListPersonsResponse>> {
    let filters: Filters = decode_json(body)?;
    tracing::info!(filters = ?filters, "request body decoded");

    let limit = int_param(query, "limit", "invalid limit value")?;
    let offset = int_param(query, "offset", "invalid offset value")?;

    let persons = state
        .store
        .list(&filters, limit, offset)
        .await
        .map_err(|e| ApiError::internal("failed to list persons", e))?;

    tracing::info!(count = persons.len(), "persons listed");
    Ok(Json(ListPersonsResponse::new(persons)))
}

/// Required integer query parameter; missing or non-numeric is a client error.
fn int_param(query: Option<&str>, key: &str, message: &'static str) -> ApiResult<i64> {
    let raw = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    });

    raw.as_deref()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| {
            tracing::error!(param = key, value = ?raw, "failed to parse query parameter");
            ApiError::InvalidParam(message)
        })
}
