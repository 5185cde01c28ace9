//! Credential Store
//!
//! Read-only access to the account table consulted during login.

use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::error::StorageError;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stored password hash for `username`, `None` when no account exists.
    async fn password_hash(&self, username: &str) -> Result<Option<String>, StorageError>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Postgres-backed store over `staging.users`.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: Pool,
}

impl PgCredentialStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn password_hash(&self, username: &str) -> Result<Option<String>, StorageError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(format!("pool checkout: {}", e)))?;
        let row = client
            .query_opt(
                "SELECT password_hash FROM staging.users WHERE username = $1",
                &[&username],
            )
            .await
            .map_err(|e| StorageError::Unavailable(format!("credential lookup: {}", e)))?;

        row.map(|r| r.try_get::<_, String>("password_hash"))
            .transpose()
            .map_err(|e| StorageError::Unavailable(format!("password_hash column: {}", e)))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(format!("pool checkout: {}", e)))?;
        client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| StorageError::Unavailable(format!("health check: {}", e)))?;
        Ok(())
    }
}
