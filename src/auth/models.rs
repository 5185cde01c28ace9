//! Authentication Models
//!
//! Data structures for login requests, token responses, and the
//! authenticated user injected by the middleware.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::Claims;

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            username: claims.sub,
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUser {
    pub username: String,
}

/// Token response after successful authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
    pub user: LoginUser,
}

impl TokenResponse {
    pub fn new(token: String, expires_at: i64, username: String) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: LoginUser { username },
        }
    }
}
