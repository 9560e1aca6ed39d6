//! Application configuration
//!
//! Centralized configuration management with environment variable support.
//! Database and enrichment settings are mandatory; server settings have
//! sensible defaults.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Default port the HTTP server listens on
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default size of the database connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors raised while reading configuration at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is present but cannot be parsed
    #[error("Invalid value for environment variable {key}: {value:?}")]
    Invalid {
        /// Name of the offending variable
        key: &'static str,
        /// Raw value that failed to parse
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// External enrichment service configuration
    pub enrichment: EnrichmentConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database host name
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password
    pub password: String,
    /// Database name
    pub name: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// External enrichment service configuration
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Base URL of the song details endpoint
    pub base_url: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            server: ServerConfig {
                port: parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?,
                host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                host: required("DB_HOST")?,
                port: parse(required("DB_PORT")?, "DB_PORT")?,
                user: required("DB_USER")?,
                password: required("DB_PASSWORD")?,
                name: required("DB_NAME")?,
                max_connections: parse_or(
                    get("DB_MAX_CONNECTIONS"),
                    "DB_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            enrichment: EnrichmentConfig {
                base_url: required("EXTERNAL_API_URL")?,
            },
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T: FromStr>(value: String, key: &'static str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |v| parse(v, key))
}
