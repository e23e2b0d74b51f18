//! Authentication context utilities.
//!
//! Provides an extractor resolving the bearer token of a request to a user.

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::User;
use crate::services::JwtService;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Authenticated user extracted from the `Authorization: Bearer` header
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_bearer_token)
            .ok_or_else(|| {
                tracing::warn!("No authorization token provided");
                ApiError::unauthorized("Not authenticated")
            })?;

        let user = state.auth_service.current_user(token).await?;
        Ok(Self { user })
    }
}
