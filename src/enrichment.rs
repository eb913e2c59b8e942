//! Enrichment client
//!
//! Predicts age, gender and nationality for a first name by asking three
//! public lookup APIs (agify, genderize, nationalize style). The lookups run
//! one after another; the first failure aborts the rest and nothing partial
//! is returned.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::EnrichmentConfig;
use crate::models::Enrichment;

/// Which of the three lookups an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Age,
    Gender,
    Country,
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Lookup::Age => "age",
            Lookup::Gender => "gender",
            Lookup::Country => "country",
        })
    }
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("{lookup} lookup failed: {source}")]
    Request {
        lookup: Lookup,
        #[source]
        source: reqwest::Error,
    },

    #[error("{lookup} lookup returned status {status}")]
    Status {
        lookup: Lookup,
        status: reqwest::StatusCode,
    },

    #[error("{lookup} lookup returned malformed body: {source}")]
    Decode {
        lookup: Lookup,
        #[source]
        source: reqwest::Error,
    },

    #[error("{lookup} lookup has no prediction for {name:?}")]
    NoPrediction { lookup: Lookup, name: String },

    #[error("country lookup returned no candidates for {name:?}")]
    NoCountry { name: String },
}

/// Source of demographic predictions for a name.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, name: &str) -> Result<Enrichment, EnrichmentError>;
}

#[derive(Debug, Deserialize)]
struct AgeResponse {
    age: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GenderResponse {
    gender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryResponse {
    #[serde(default)]
    country: Vec<CountryCandidate>,
}

#[derive(Debug, Deserialize)]
struct CountryCandidate {
    country_id: String,
}

/// [`Enricher`] backed by the public HTTP lookup APIs.
#[derive(Debug, Clone)]
pub struct HttpEnricher {
    http: Client,
    age_url: String,
    gender_url: String,
    country_url: String,
}

impl HttpEnricher {
    pub fn new(http: Client, config: &EnrichmentConfig) -> Self {
        Self {
            http,
            age_url: config.age_url.clone(),
            gender_url: config.gender_url.clone(),
            country_url: config.country_url.clone(),
        }
    }

    /// GET `<base_url>?name=<name>` and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        lookup: Lookup,
        base_url: &str,
        name: &str,
    ) -> Result<T, EnrichmentError> {
        let response = self
            .http
            .get(base_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|source| EnrichmentError::Request { lookup, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status { lookup, status });
        }

        response
            .json()
            .await
            .map_err(|source| EnrichmentError::Decode { lookup, source })
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, name: &str) -> Result<Enrichment, EnrichmentError> {
        let age: AgeResponse = self.get(Lookup::Age, &self.age_url, name).await?;
        let age = age.age.ok_or_else(|| EnrichmentError::NoPrediction {
            lookup: Lookup::Age,
            name: name.to_string(),
        })?;

        let gender: GenderResponse = self.get(Lookup::Gender, &self.gender_url, name).await?;
        let gender = gender.gender.ok_or_else(|| EnrichmentError::NoPrediction {
            lookup: Lookup::Gender,
            name: name.to_string(),
        })?;

        let countries: CountryResponse =
            self.get(Lookup::Country, &self.country_url, name).await?;
        // Candidates arrive ranked; the first one wins.
        let country = countries
            .country
            .into_iter()
            .next()
            .map(|c| c.country_id)
            .ok_or_else(|| EnrichmentError::NoCountry {
                name: name.to_string(),
            })?;

        tracing::debug!(name, age, gender = %gender, country = %country, "name enriched");

        Ok(Enrichment {
            age,
            gender,
            country,
        })
    }
}
