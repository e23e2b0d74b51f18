use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored account for the placeholder user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub email: String,
    pub full_name: String,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self {
            email: record.email.clone(),
            full_name: record.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SignupResponse {
    pub msg: String,
}

/// Form body for `POST /auth/login`; `username` carries the email address.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
