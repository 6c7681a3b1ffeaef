use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;
use std::env;

pub const DEFAULT_DATABASE: &str = "TextAnalyzerDB";
pub const DEFAULT_CONTAINER: &str = "AnalysisResults";

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required for the `mongo` backend.
    pub connection_string: Option<Secret<String>>,
    pub database: String,
    pub container: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl AnalyzerConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env and the APP__ prefix
        let common_config = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let connection_string = match backend {
            StoreBackend::Mongo => Some(get_env("COSMOS_CONNECTION_STRING", None, is_prod)?),
            StoreBackend::Memory => env::var("COSMOS_CONNECTION_STRING").ok(),
        };

        Ok(AnalyzerConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("text-analyzer-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            store: StoreConfig {
                backend,
                connection_string: connection_string.map(Secret::new),
                database: get_env("COSMOS_DATABASE", Some(DEFAULT_DATABASE), is_prod)?,
                container: get_env("COSMOS_CONTAINER", Some(DEFAULT_CONTAINER), is_prod)?,
            },
        })
    }

    /// Configuration for running against the in-memory store.
    pub fn in_memory() -> Self {
        AnalyzerConfig {
            common: core_config::Config::default(),
            environment: Environment::Dev,
            service_name: "text-analyzer-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                connection_string: None,
                database: DEFAULT_DATABASE.to_string(),
                container: DEFAULT_CONTAINER.to_string(),
            },
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "cosmos" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}
