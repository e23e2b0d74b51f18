//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod auth;
pub mod auth_context;
pub mod diagrams;
pub mod error;
pub mod health;
pub mod openapi;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use app_state::AppState;

use crate::config::AppConfig;
use crate::middleware::create_custom_cors_layer;

/// Create the main API router combining all route modules
///
/// Note: State is applied by callers (see [`create_app`]), so tests can build
/// the router around their own `AppState`.
pub fn create_api_router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::health_router())
        .merge(diagrams::diagrams_router())
        .nest("/auth", auth::auth_router(app_state.auth_rate_limiter.clone()))
        .merge(openapi::openapi_router())
}

/// Build the complete application: routes, state, tracing and CORS layers.
pub fn create_app(app_state: AppState, config: &AppConfig) -> Router {
    create_api_router(app_state.clone())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_custom_cors_layer(&config.cors_allowed_origins)),
        )
}

/// Create the application state with in-memory storage and default configuration.
pub fn create_app_state() -> AppState {
    AppState::in_memory(&AppConfig::default())
}

/// Create the application state with storage initialization (async).
///
/// This is the preferred method for production use.
pub async fn create_app_state_with_storage(
    config: &AppConfig,
) -> Result<AppState, crate::storage::StorageError> {
    AppState::init(config).await
}
