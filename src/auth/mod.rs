//! # Authentication Module
//!
//! Credential verification, session token issuance and validation, and the
//! middleware that guards protected routes.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod verifier;

pub use jwt::JwtService;
pub use middleware::AuthMiddleware;
pub use verifier::CredentialVerifier;
