//! Authentication Middleware
//!
//! Axum middleware for session token validation on protected routes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{jwt::JwtService, models::AuthUser};
use crate::error::AuthError;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authentication middleware that validates JWT tokens and injects user info
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Middleware function for validating JWT tokens
    pub async fn validate_token(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, AuthError> {
        let token = match extract_token(req.headers()) {
            Some(token) => token,
            None => {
                tracing::warn!(
                    "[AuthMiddleware] {} {} without bearer token",
                    req.method(),
                    req.uri().path()
                );
                return Err(AuthError::MissingToken);
            }
        };

        let claims = jwt_service.validate(&token).map_err(|e| {
            tracing::warn!("[AuthMiddleware] Token rejected on {}: {}", req.uri().path(), e);
            AuthError::from(e)
        })?;

        tracing::debug!("[AuthMiddleware] Authenticated '{}'", claims.sub);
        req.extensions_mut().insert(AuthUser::from(claims));

        Ok(next.run(req).await)
    }
}

/// Bearer header first, then the `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic YWxpY2U6cHc="));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; access_token=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }
}
