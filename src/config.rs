//! Server configuration
//!
//! Loaded from a YAML file (path in `CONFIG_PATH`, default
//! `config/local.yaml`), then overridden field by field from environment
//! variables so secrets can stay out of the file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/local.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Deployment environment; selects the log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    Dev,
    Prod,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub env: Env,
    pub http_server: HttpServerConfig,
    pub postgres: PostgresConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub address: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    4
}

#[derive(Clone, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub dbname: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
    }
}

fn default_pg_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

/// Base URLs of the three name-lookup APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    pub age_url: String,
    pub gender_url: String,
    pub country_url: String,
}

impl Config {
    /// Load from `CONFIG_PATH` (or the default path) and apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overwrite fields from variables returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HTTP_SERVER_ADDRESS") {
            self.http_server.address = v;
        }
        if let Some(v) = lookup("POSTGRES_HOST") {
            self.postgres.host = v;
        }
        if let Some(v) = lookup("POSTGRES_PORT") {
            self.postgres.port = v
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("POSTGRES_PORT is not a port: {v}")))?;
        }
        if let Some(v) = lookup("POSTGRES_USER") {
            self.postgres.user = v;
        }
        if let Some(v) = lookup("POSTGRES_PASSWORD") {
            self.postgres.password = v;
        }
        if let Some(v) = lookup("POSTGRES_DB") {
            self.postgres.dbname = v;
        }
        if let Some(v) = lookup("API_AGIFY_URL") {
            self.enrichment.age_url = v;
        }
        if let Some(v) = lookup("API_GENDERIZE_URL") {
            self.enrichment.gender_url = v;
        }
        if let Some(v) = lookup("API_NATIONALIZE_URL") {
            self.enrichment.country_url = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_server.address.trim().is_empty() {
            return Err(ConfigError::Invalid("http_server.address is empty".into()));
        }
        for (key, value) in [
            ("enrichment.age_url", &self.enrichment.age_url),
            ("enrichment.gender_url", &self.enrichment.gender_url),
            ("enrichment.country_url", &self.enrichment.country_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{key} ({value}): {e}")))?;
        }
        Ok(())
    }
}
