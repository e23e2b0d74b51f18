//! Placeholder account service backing the `/auth` routes.
//!
//! Accounts live in an injected [`UserStore`](crate::storage::UserStore);
//! nothing in the diagram API depends on them.

use super::jwt_service::SharedJwtService;
use super::password::{hash_password, verify_password};
use crate::models::{SignupRequest, User, UserRecord};
use crate::storage::{SharedUserStore, StorageError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid signup request: {0}")]
    InvalidSignup(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token is invalid or expired: {0}")]
    InvalidToken(String),
    #[error("Token could not be issued: {0}")]
    TokenIssue(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct AuthService {
    users: SharedUserStore,
    jwt: SharedJwtService,
}

impl AuthService {
    pub fn new(users: SharedUserStore, jwt: SharedJwtService) -> Self {
        Self { users, jwt }
    }

    /// Register a new account.
    pub async fn signup(&self, request: SignupRequest) -> Result<(), AuthError> {
        let email = request.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(AuthError::InvalidSignup(format!(
                "'{}' is not a valid email address",
                request.email
            )));
        }
        if request.password.is_empty() {
            return Err(AuthError::InvalidSignup("password must not be empty".to_string()));
        }

        if self.users.get_user(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let record = UserRecord {
            email: email.clone(),
            full_name: request.full_name,
            password_hash: hash_password(&request.password),
        };
        match self.users.insert_user(record).await {
            Ok(()) => {}
            // Lost a race with a concurrent signup for the same email.
            Err(StorageError::ConstraintViolation(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {}", email);
        Ok(())
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let email = username.trim().to_lowercase();
        let Some(user) = self.users.get_user(&email).await? else {
            warn!("Login attempt for unknown user {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            warn!("Invalid password for user {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        self.jwt
            .generate_access_token(&user.email)
            .map_err(AuthError::TokenIssue)
    }

    /// Resolve an access token to the account it was issued for.
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .jwt
            .validate_access_token(token)
            .map_err(AuthError::InvalidToken)?;

        let user = self
            .users
            .get_user(&claims.sub)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("user not found".to_string()))?;
        Ok(User::from(&user))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
