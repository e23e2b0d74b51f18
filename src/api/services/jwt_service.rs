//! JWT Service for token generation and validation.
//!
//! Issues short-lived HS256 access tokens for the placeholder login flow.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_MINUTES: i64 = 30;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT Service configuration
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_duration: Duration,
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_duration: Duration::minutes(ACCESS_TOKEN_MINUTES),
        }
    }

    /// Issue an access token for the given email
    pub fn generate_access_token(&self, email: &str) -> Result<String, String> {
        let now = Utc::now();
        let exp = now + self.access_token_duration;
        let claims = Claims {
            sub: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| format!("Failed to encode access token: {}", e))?;

        info!("Generated access token for user {}, expires: {}", email, exp);
        Ok(token)
    }

    /// Validate an access token and return the claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, String> {
        let token_data = self.decode_token(token)?;
        Ok(token_data.claims)
    }

    /// Decode and validate a token (checks signature and expiration)
    fn decode_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidToken => "Invalid token format".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                "Invalid token signature".to_string()
            }
            _ => format!("Token validation failed: {}", e),
        })
    }

    /// Extract bearer token from Authorization header
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
    }
}

/// Shared JWT service for use across the application
pub type SharedJwtService = Arc<JwtService>;
