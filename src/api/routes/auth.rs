//! Authentication routes (placeholder): signup, password login, current user.

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use std::sync::Arc;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::{ApiError, ErrorBody};
use crate::middleware::{RateLimiterState, rate_limit_middleware};
use crate::models::{LoginForm, SignupRequest, SignupResponse, TokenResponse, User};
use crate::services::AuthService;

/// Create the auth router; every route shares `limiter`.
pub fn auth_router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ))
}

/// POST /auth/signup - Register an account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Email already registered or invalid", body = ErrorBody),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn signup(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    service.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            msg: "User created successfully".to_string(),
        }),
    ))
}

/// POST /auth/login - Exchange form credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let access_token = service.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /auth/me - The user the bearer token was issued for
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(auth: AuthContext) -> Json<User> {
    Json(auth.user)
}
