//! # Server Module
//!
//! HTTP server setup and route configuration.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthMiddleware, CredentialVerifier, JwtService, password::PasswordHasher};
use crate::config::Config;
use crate::database::{
    DatabaseConnection, PgCredentialStore, PgUsuarioRepository, UsuarioRepository, migrations,
};
use crate::routes::{auth, health, usuarios};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub verifier: Arc<CredentialVerifier>,
    pub usuarios: Arc<dyn UsuarioRepository>,
    pub cookie_secure: bool,
}

/// Builds the full router: public routes, plus everything behind the
/// token middleware.
pub fn router(app_state: AppState, cors: CorsLayer) -> Router {
    let protected = Router::new()
        .merge(auth::create_protected_routes())
        .merge(usuarios::create_routes())
        .layer(middleware::from_fn_with_state(
            app_state.jwt_service.clone(),
            AuthMiddleware::validate_token,
        ));

    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .merge(auth::create_public_routes())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}

/// Any origin when none are configured; credentials are only allowed for an
/// explicit origin list.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins).allow_credentials(true))
}

/// Connects to the database, wires the auth boundary and serves until
/// Ctrl+C.
pub async fn start(config: Config) -> Result<()> {
    // Key problems abort startup here rather than failing per request.
    let jwt_service = Arc::new(
        JwtService::new(&config.auth.jwt_secret, config.auth.token_ttl)
            .context("Invalid signing key configuration")?,
    );

    let db = DatabaseConnection::new(config.database.clone()).await?;
    if config.run_migrations {
        migrations::run_migrations(db.pool()).await?;
    }

    let verifier = CredentialVerifier::new(
        Arc::new(PgCredentialStore::new(db.pool().clone())),
        PasswordHasher::default(),
        config.auth.credential_lookup_timeout,
    )?;

    let app_state = AppState {
        jwt_service,
        verifier: Arc::new(verifier),
        usuarios: Arc::new(PgUsuarioRepository::new(db.pool().clone())),
        cookie_secure: config.auth.cookie_secure,
    };

    let app = router(app_state, cors_layer(&config.server.cors_allowed_origins)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Admin panel server listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("🔐 Login at POST http://{}/login", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
