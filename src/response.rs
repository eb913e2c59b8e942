//! JSON response envelope
//!
//! Every response body is an object with `status` ("OK" or "Error"), an
//! optional `error` message, and the operation-specific fields flattened in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Person;
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Error")]
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error: Some(msg.into()),
        }
    }
}

/// POST /persons
#[derive(Debug, Serialize)]
pub struct CreatePersonResponse {
    #[serde(flatten)]
    pub response: Response,
    pub id: i64,
}

impl CreatePersonResponse {
    pub fn new(id: i64) -> Self {
        Self {
            response: Response::ok(),
            id,
        }
    }
}

/// GET /persons
#[derive(Debug, Serialize)]
pub struct ListPersonsResponse {
    #[serde(flatten)]
    pub response: Response,
    pub persons: Vec<Person>,
}

impl ListPersonsResponse {
    pub fn new(persons: Vec<Person>) -> Self {
        Self {
            response: Response::ok(),
            persons,
        }
    }
}

/// Error envelope for failed field validation: the joined message plus a
/// field -> reason map.
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    #[serde(flatten)]
    pub response: Response,
    pub fields: BTreeMap<&'static str, &'static str>,
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errs: &ValidationErrors) -> Self {
        Self {
            response: Response::error(errs.to_string()),
            fields: errs.iter().map(|e| (e.field, e.reason.as_str())).collect(),
        }
    }
}
