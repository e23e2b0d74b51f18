//! Application configuration read from environment variables.

use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// JWT secret used when `APP_ENV=development` and `JWT_SECRET` is unset.
pub const DEVELOPMENT_JWT_SECRET: &str = "dev-secret-do-not-use-in-production-change-me-now";

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("JWT_SECRET environment variable is required in production")]
    MissingJwtSecret,
    #[error("JWT_SECRET must be at least 32 characters in production")]
    WeakJwtSecret,
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,
    /// PostgreSQL connection string; in-memory storage when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Origins allowed by CORS, credentials included
    pub cors_allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub development: bool,
    /// Seed the sample diagrams into an empty store at startup
    pub seed_mock_data: bool,
    pub auth_rate_limit_per_minute: u32,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            database_max_connections: 5,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            development: true,
            seed_mock_data: false,
            auth_rate_limit_per_minute: 60,
            otel_service_name: "fishbone-api".to_string(),
            otel_exporter_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from a map of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let app_env = var("APP_ENV").unwrap_or_else(|| "production".to_string());
        let development = app_env.eq_ignore_ascii_case("development");

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Some(secret) if development => {
                warn!("JWT_SECRET is less than 32 characters. Consider using a longer secret.");
                secret
            }
            Some(_) => return Err(ConfigError::WeakJwtSecret),
            None if development => {
                warn!(
                    "JWT_SECRET not set! Using default secret for development. DO NOT USE IN PRODUCTION!"
                );
                DEVELOPMENT_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingJwtSecret),
        };

        let cors_allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_allowed_origins,
        };

        Ok(Self {
            port: parse_or("PORT", var("PORT"), defaults.port)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            )?,
            cors_allowed_origins,
            jwt_secret,
            development,
            seed_mock_data: parse_bool("SEED_MOCK_DATA", var("SEED_MOCK_DATA"))?,
            auth_rate_limit_per_minute: parse_or(
                "AUTH_RATE_LIMIT_PER_MINUTE",
                var("AUTH_RATE_LIMIT_PER_MINUTE"),
                defaults.auth_rate_limit_per_minute,
            )?,
            otel_service_name: var("OTEL_SERVICE_NAME").unwrap_or(defaults.otel_service_name),
            otel_exporter_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}
