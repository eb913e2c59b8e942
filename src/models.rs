//! Person records and listing filters.

use serde::{Deserialize, Serialize};

/// A stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub age: i64,
    pub gender: String,
    pub country: String,
}

/// A person that has not been inserted yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: i64,
    pub gender: String,
    pub country: String,
}

/// Conjunctive listing filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filters {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub country: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Demographic predictions for a first name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub age: i64,
    pub gender: String,
    pub country: String,
}
