//! Shared fixtures: an in-memory `PersonStore` and stub enrichment APIs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode},
    routing::{get, MethodRouter},
    Router,
};
use http_body_util::BodyExt;
use tokio::net::TcpListener;
use tower::ServiceExt;

use person_extender::config::EnrichmentConfig;
use person_extender::models::{Filters, NewPerson, Person};
use person_extender::store::{PersonStore, Result, StoreError};
use person_extender::{build_router, AppState, HttpEnricher};

// ── In-memory store ────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Person>>,
    next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, person: NewPerson) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.rows.lock().unwrap().push(with_id(person, id));
        id
    }

    pub fn rows(&self) -> Vec<Person> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database {
                op,
                source: sqlx::Error::PoolClosed,
            });
        }
        Ok(())
    }
}

fn with_id(person: NewPerson, id: i64) -> Person {
    Person {
        id,
        name: person.name,
        surname: person.surname,
        patronymic: person.patronymic,
        age: person.age,
        gender: person.gender,
        country: person.country,
    }
}

fn matches(filters: &Filters, p: &Person) -> bool {
    filters.name.as_ref().map_or(true, |v| *v == p.name)
        && filters.surname.as_ref().map_or(true, |v| *v == p.surname)
        && filters
            .patronymic
            .as_ref()
            .map_or(true, |v| p.patronymic.as_ref() == Some(v))
        && filters.age.map_or(true, |v| v == p.age)
        && filters.gender.as_ref().map_or(true, |v| *v == p.gender)
        && filters.country.as_ref().map_or(true, |v| *v == p.country)
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn create(&self, person: &NewPerson) -> Result<i64> {
        self.check("memory.create")?;
        Ok(self.insert(person.clone()))
    }

    async fn update(&self, person: &Person) -> Result<()> {
        self.check("memory.update")?;
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id == person.id) {
            *row = person.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check("memory.delete")?;
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn list(&self, filters: &Filters, limit: i64, offset: i64) -> Result<Vec<Person>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check("memory.list")?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches(filters, p))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check("memory.ping")
    }
}

pub fn new_person(name: &str, surname: &str, gender: &str) -> NewPerson {
    NewPerson {
        name: name.into(),
        surname: surname.into(),
        patronymic: None,
        age: 30,
        gender: gender.into(),
        country: "US".into(),
    }
}

// ── Stub enrichment APIs ───────────────────────────────────────

/// Status and raw body one stub endpoint answers with.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: r#"{"error":"stub"}"#.to_string(),
        }
    }
}

pub struct StubApis {
    pub config: EnrichmentConfig,
    /// `name` query values received, per endpoint.
    pub age_names: Arc<Mutex<Vec<String>>>,
    pub gender_names: Arc<Mutex<Vec<String>>>,
    pub country_names: Arc<Mutex<Vec<String>>>,
}

impl StubApis {
    pub fn total_calls(&self) -> usize {
        self.age_names.lock().unwrap().len()
            + self.gender_names.lock().unwrap().len()
            + self.country_names.lock().unwrap().len()
    }
}

fn canned(reply: Canned, seen: Arc<Mutex<Vec<String>>>) -> MethodRouter {
    get(move |Query(query): Query<HashMap<String, String>>| {
        let reply = reply.clone();
        let seen = seen.clone();
        async move {
            seen.lock()
                .unwrap()
                .push(query.get("name").cloned().unwrap_or_default());
            (
                reply.status,
                [(header::CONTENT_TYPE, "application/json")],
                reply.body,
            )
        }
    })
}

pub async fn spawn_stub_apis(age: Canned, gender: Canned, country: Canned) -> StubApis {
    let age_names = Arc::new(Mutex::new(Vec::new()));
    let gender_names = Arc::new(Mutex::new(Vec::new()));
    let country_names = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/age", canned(age, age_names.clone()))
        .route("/gender", canned(gender, gender_names.clone()))
        .route("/country", canned(country, country_names.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubApis {
        config: EnrichmentConfig {
            age_url: format!("http://{addr}/age"),
            gender_url: format!("http://{addr}/gender"),
            country_url: format!("http://{addr}/country"),
        },
        age_names,
        gender_names,
        country_names,
    }
}

/// Stubs answering like the public APIs do for "Michael".
pub async fn spawn_michael_apis() -> StubApis {
    spawn_stub_apis(
        Canned::ok(r#"{"count":1,"name":"Michael","age":42}"#),
        Canned::ok(r#"{"count":1,"name":"Michael","gender":"male","probability":0.99}"#),
        Canned::ok(r#"{"name":"Michael","country":[{"country_id":"US","probability":0.5}]}"#),
    )
    .await
}

pub fn enricher(config: &EnrichmentConfig) -> HttpEnricher {
    HttpEnricher::new(reqwest::Client::new(), config)
}

// ── Router helpers ─────────────────────────────────────────────

pub fn app(store: Arc<MemoryStore>, apis: &StubApis) -> Router {
    let state = AppState::new(store, Arc::new(enricher(&apis.config)));
    build_router(state, Duration::from_secs(5))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    );
    (status, json)
}
