//! Person persistence.
//!
//! Handlers talk to the [`PersonStore`] trait; [`PgPersonStore`] is the
//! Postgres implementation used by the server.

mod postgres;

pub use postgres::PgPersonStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Filters, NewPerson, Person};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("storage.postgres.migrate: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub(crate) fn database(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { op, source }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Insert a person and return the id the store assigned.
    async fn create(&self, person: &NewPerson) -> Result<i64>;

    /// Replace every field of the row with `person.id`.
    /// An unknown id is not an error; nothing is written.
    async fn update(&self, person: &Person) -> Result<()>;

    /// Remove the row with `id`. An unknown id is not an error.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Rows matching every present filter field, windowed by limit/offset.
    async fn list(&self, filters: &Filters, limit: i64, offset: i64) -> Result<Vec<Person>>;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}
