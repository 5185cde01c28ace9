//! Configuration module for environment variables and application settings

use anyhow::{Context, Result, anyhow};
use std::env;
use std::time::Duration;

use crate::auth::jwt::MIN_SECRET_LEN;
use crate::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Session token and login configuration
    pub auth: AuthConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub credential_lookup_timeout: Duration,
    pub cookie_secure: bool,
}

// Keeps the secret out of startup logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("credential_lookup_timeout", &self.credential_lookup_timeout)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "JWT_SECRET must be at least {} bytes long",
                MIN_SECRET_LEN
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(var("PORT").or_else(|| var("SERVER_PORT")), 3001, "PORT")?,
                cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },

            auth: AuthConfig {
                jwt_secret,
                token_ttl: Duration::from_secs(parse_or(
                    var("TOKEN_TTL_SECS"),
                    3600,
                    "TOKEN_TTL_SECS",
                )?),
                credential_lookup_timeout: Duration::from_millis(parse_or(
                    var("CREDENTIAL_LOOKUP_TIMEOUT_MS"),
                    2000,
                    "CREDENTIAL_LOOKUP_TIMEOUT_MS",
                )?),
                cookie_secure: parse_or(var("COOKIE_SECURE"), true, "COOKIE_SECURE")?,
            },

            database: DatabaseConfig::from_lookup(&var)?,

            run_migrations: parse_or(var("RUN_MIGRATIONS"), true, "RUN_MIGRATIONS")?,
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}
