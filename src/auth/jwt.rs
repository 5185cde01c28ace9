//! JWT Token Service
//!
//! Issues and validates the stateless session tokens handed out at login.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

pub const TOKEN_ISSUER: &str = "admin-panel-server";

/// Minimum accepted length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// JWT Claims structure bound to an account
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username of the authenticated account
    pub sub: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service. A missing or short secret is a startup error.
    pub fn new(secret: &str, ttl: std::time::Duration) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            bail!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                secret.len()
            );
        }
        let ttl = Duration::from_std(ttl)?;
        if ttl <= Duration::zero() {
            bail!("token TTL must be positive");
        }
        if Utc::now().checked_add_signed(ttl).is_none() {
            bail!("token TTL of {} seconds is out of range", ttl.num_seconds());
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Expiry is checked against an explicit clock in `validate_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a token for `subject`, valid from now for the configured TTL
    #[cfg(test)]
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or_else(|| anyhow!("token expiry out of range"))?
                .timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Signature first, then `now < exp`. A bad signature is always
    /// `Malformed`, whatever its expiry says.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("JWT rejected: {:?}", e.kind());
            TokenError::Malformed
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
