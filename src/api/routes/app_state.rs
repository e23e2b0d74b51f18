//! Application state management.
//!
//! Defines the AppState struct that holds all shared application state:
//! the diagram service over its storage backend, the placeholder account
//! service, and the auth rate limiter.

use crate::config::AppConfig;
use crate::middleware::{RateLimiterState, create_rate_limiter_with_quota};
use crate::services::{AuthService, DiagramService, JwtService};
use crate::storage::{
    InMemoryStorageBackend, InMemoryUserStore, PostgresStorageBackend, StorageBackend,
    StorageError,
};
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Diagram lifecycle and bone tree operations
    pub diagram_service: Arc<DiagramService>,
    /// Placeholder signup/login
    pub auth_service: Arc<AuthService>,
    /// Quota applied to the /auth routes
    pub auth_rate_limiter: RateLimiterState,
}

impl AppState {
    /// Create application state over the given storage backend.
    pub fn new(config: &AppConfig, storage: Arc<dyn StorageBackend>) -> Self {
        let jwt_service = Arc::new(JwtService::new(&config.jwt_secret));
        Self {
            diagram_service: Arc::new(DiagramService::new(storage)),
            auth_service: Arc::new(AuthService::new(
                Arc::new(InMemoryUserStore::new()),
                jwt_service,
            )),
            auth_rate_limiter: create_rate_limiter_with_quota(config.auth_rate_limit_per_minute),
        }
    }

    /// Create application state backed by in-memory storage.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(config, Arc::new(InMemoryStorageBackend::new()))
    }

    /// Replace the diagram service, e.g. to inject an id generator.
    pub fn with_diagram_service(mut self, diagram_service: DiagramService) -> Self {
        self.diagram_service = Arc::new(diagram_service);
        self
    }

    /// Initialize storage from configuration.
    ///
    /// Connects to PostgreSQL and runs migrations if DATABASE_URL is set,
    /// otherwise falls back to in-memory storage.
    pub async fn init(config: &AppConfig) -> Result<Self, StorageError> {
        let Some(database_url) = config.database_url.as_deref() else {
            info!("DATABASE_URL not set, using in-memory storage");
            return Ok(Self::in_memory(config));
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                StorageError::ConnectionError(format!("Failed to connect to database: {}", e))
            })?;

        let backend = PostgresStorageBackend::new(pool);
        backend.migrate().await?;
        info!("Using PostgreSQL storage");

        Ok(Self::new(config, Arc::new(backend)))
    }
}

// Allow services to be extracted from AppState (for Axum)
impl FromRef<AppState> for Arc<DiagramService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.diagram_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
