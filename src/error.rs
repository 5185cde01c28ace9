//! Error Types
//!
//! Typed failures for the authentication boundary and the resource routes,
//! plus their HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Message returned for every token failure so callers cannot tell
/// tampering apart from staleness.
pub const GENERIC_TOKEN_MESSAGE: &str = "invalid or expired token";

/// Failure talking to the relational store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Outcome of a rejected session token.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not match")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

/// Authentication boundary errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    StorageUnavailable(#[from] StorageError),

    #[error("missing bearer token")]
    MissingToken,

    #[error("token malformed")]
    TokenMalformed,

    #[error("token expired")]
    TokenExpired,

    #[error("failed to issue token: {0}")]
    TokenIssue(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenMalformed
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message; internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid username or password",
            AuthError::MissingToken => "missing bearer token",
            AuthError::TokenMalformed | AuthError::TokenExpired => GENERIC_TOKEN_MESSAGE,
            AuthError::StorageUnavailable(_) => "service temporarily unavailable",
            AuthError::TokenIssue(_) => "internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::StorageUnavailable(e) => tracing::error!("Credential store failure: {}", e),
            AuthError::TokenIssue(e) => tracing::error!("Token issuance failure: {}", e),
            other => tracing::debug!("Rejected request: {}", other),
        }
        let status = self.status_code();
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Errors returned by the resource routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

// Extractor rejections are rendered like every other client error instead
// of axum's plain-text bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Storage(StorageError::Conflict(msg)) => {
                (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Storage(err) => {
                tracing::error!("Storage failure: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "service temporarily unavailable" })),
                )
                    .into_response()
            }
        }
    }
}
