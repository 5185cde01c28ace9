//! Auth routes for login, logout, and the current session

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use serde_json::{Value, json};

use crate::auth::middleware::ACCESS_TOKEN_COOKIE;
use crate::auth::models::{AuthUser, LoginRequest, TokenResponse};
use crate::error::{ApiError, AuthError};
use crate::server::AppState;

pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<(CookieJar, Json<TokenResponse>), AuthError> {
    let username = payload.username.as_str();

    if !app_state.verifier.verify(username, &payload.password).await? {
        tracing::warn!("Login rejected for '{}'", username);
        return Err(AuthError::InvalidCredentials);
    }

    let now = chrono::Utc::now();
    let token = app_state
        .jwt_service
        .issue_at(username, now)
        .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
    let ttl = app_state.jwt_service.ttl();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::TokenIssue("token expiry out of range".to_string()))?
        .timestamp();

    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, token.clone());
    cookie.set_http_only(true);
    cookie.set_secure(app_state.cookie_secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(ttl.num_seconds()));

    tracing::info!("Login succeeded for '{}'", username);
    Ok((
        jar.add(cookie),
        Json(TokenResponse::new(token, expires_at, username.to_string())),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    // Stateless tokens: expiring the cookie is all the server can do. Sent
    // unconditionally, whether or not the request carried the cookie.
    let expired = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO);
    (StatusCode::NO_CONTENT, jar.add(expired))
}

pub async fn me(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "username": user.username,
        "expires_at": user.expires_at.timestamp(),
    }))
}

pub fn create_public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn create_protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
