//! person-extender is a REST registry of people whose age, gender and
//! nationality are predicted from their first name at creation time.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
pub mod router;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use enrichment::{Enricher, HttpEnricher};
pub use router::build_router;
pub use state::AppState;
pub use store::{PersonStore, PgPersonStore};
