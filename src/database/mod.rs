//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with a deadpool pool.
//! Includes connection management, the credential store, the usuario
//! repository, and migrations.

pub mod connection;
pub mod credentials;
pub mod migrations;
pub mod models;
pub mod usuarios;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use credentials::PgCredentialStore;
pub use usuarios::{PgUsuarioRepository, UsuarioRepository};
