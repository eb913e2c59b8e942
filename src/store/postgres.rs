//! Postgres implementation of [`PersonStore`].
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time database requirement.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Encode, Postgres, QueryBuilder, Type};

use super::{PersonStore, Result, StoreError};
use crate::config::PostgresConfig;
use crate::models::{Filters, NewPerson, Person};

/// Postgres-backed person store.
#[derive(Debug, Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from config, check the connection and apply migrations.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await
            .map_err(StoreError::database("storage.postgres.connect"))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `SELECT ... FROM persons [WHERE a = $1 AND b = $2 ...] LIMIT $n OFFSET $m`
pub(crate) fn list_query(filters: &Filters, limit: i64, offset: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT id, name, surname, patronymic, age, gender, country FROM persons",
    );
    let mut sep = " WHERE ";

    if let Some(name) = &filters.name {
        push_eq(&mut qb, &mut sep, "name", name.clone());
    }
    if let Some(surname) = &filters.surname {
        push_eq(&mut qb, &mut sep, "surname", surname.clone());
    }
    if let Some(patronymic) = &filters.patronymic {
        push_eq(&mut qb, &mut sep, "patronymic", patronymic.clone());
    }
    if let Some(age) = filters.age {
        push_eq(&mut qb, &mut sep, "age", age);
    }
    if let Some(gender) = &filters.gender {
        push_eq(&mut qb, &mut sep, "gender", gender.clone());
    }
    if let Some(country) = &filters.country {
        push_eq(&mut qb, &mut sep, "country", country.clone());
    }

    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);
    qb
}

fn push_eq<'args, T>(
    qb: &mut QueryBuilder<'args, Postgres>,
    sep: &mut &'static str,
    column: &'static str,
    value: T,
) where
    T: 'args + Encode<'args, Postgres> + Type<Postgres>,
{
    qb.push(*sep).push(column).push(" = ").push_bind(value);
    *sep = " AND ";
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn create(&self, person: &NewPerson) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO persons (name, surname, patronymic, age, gender, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(person.age)
        .bind(&person.gender)
        .bind(&person.country)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::database("storage.postgres.create"))?;

        Ok(id)
    }

    async fn update(&self, person: &Person) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE persons
            SET name = $2, surname = $3, patronymic = $4, age = $5, gender = $6, country = $7
            WHERE id = $1
            "#,
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(person.age)
        .bind(&person.gender)
        .bind(&person.country)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("storage.postgres.update"))?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::database("storage.postgres.delete"))?;

        Ok(())
    }

    async fn list(&self, filters: &Filters, limit: i64, offset: i64) -> Result<Vec<Person>> {
        let mut qb = list_query(filters, limit, offset);
        tracing::debug!(sql = qb.sql(), unfiltered = filters.is_empty(), "listing persons");

        qb.build_query_as::<Person>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database("storage.postgres.list"))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::database("storage.postgres.ping"))?;
        Ok(())
    }
}
