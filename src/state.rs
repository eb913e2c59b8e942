//! Shared application state

use std::sync::Arc;

use crate::enrichment::Enricher;
use crate::store::PersonStore;

/// Shared application state for the person handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersonStore>,
    pub enricher: Arc<dyn Enricher>,
}

impl AppState {
    pub fn new(store: Arc<dyn PersonStore>, enricher: Arc<dyn Enricher>) -> Self {
        Self { store, enricher }
    }
}
