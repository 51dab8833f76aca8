pub mod seed;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub suggestions: SuggestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    pub api_rate_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub api_max_limit: usize,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Upper bound on candidates pulled from the store before scoring
    pub recall_cap: usize,
    pub max_results: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 12,
            api_max_limit: 100,
            max_request_body_size: 10 * 1024 * 1024,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            recall_cap: 10,
            max_results: 6,
        }
    }
}

/// Read an environment variable, falling back to `default` when unset
fn env_or<T: FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/cookshare.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let external_url = std::env::var("EXTERNAL_URL").ok();

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "1")?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", "30")?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", "600")?,
            },
            server: ServerConfig {
                host,
                port: env_or("PORT", "5000")?,
                external_url,
                api_rate_limit: env_or("API_RATE_LIMIT", "100")?,
            },
            pagination: PaginationConfig {
                default_limit: env_or("DEFAULT_PAGE_SIZE", "12")?,
                api_max_limit: env_or("API_MAX_LIMIT", "100")?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "10485760")?,
            },
            suggestions: SuggestionConfig {
                recall_cap: env_or("SUGGESTION_RECALL_CAP", "10")?,
                max_results: env_or("SUGGESTION_MAX_RESULTS", "6")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.pagination.default_limit == 0 {
            return Err(Error::Config(
                "Default page size must be non-zero".to_string(),
            ));
        }

        if self.pagination.default_limit > self.pagination.api_max_limit {
            return Err(Error::Config(format!(
                "Default page size {} exceeds API_MAX_LIMIT {}",
                self.pagination.default_limit, self.pagination.api_max_limit
            )));
        }

        if self.suggestions.recall_cap == 0 || self.suggestions.max_results == 0 {
            return Err(Error::Config(
                "Suggestion limits must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL used by CLI clients to reach a running server
    pub fn server_url(&self) -> String {
        self.server
            .external_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}
