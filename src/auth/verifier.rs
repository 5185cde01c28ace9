//! Credential Verifier
//!
//! Checks a submitted username/password pair against the credential store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::auth::password::{PasswordCheck, PasswordHasher};
use crate::database::credentials::CredentialStore;
use crate::error::StorageError;

pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    lookup_timeout: Duration,
    /// Verified against when the account does not exist, so unknown
    /// usernames cost the same as wrong passwords.
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        lookup_timeout: Duration,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash("admin-panel-server/dummy-password")?;
        Ok(Self {
            store,
            hasher,
            lookup_timeout,
            dummy_hash,
        })
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// `Ok(true)` only when the account exists and the password matches.
    /// Storage failures and timeouts are errors, never `Ok(false)`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, StorageError> {
        if username.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let stored = tokio::time::timeout(self.lookup_timeout, self.store.password_hash(username))
            .await
            .map_err(|_| StorageError::Timeout(self.lookup_timeout))??;

        let Some(check) = self.check_password(password, stored).await else {
            return Ok(false);
        };

        match check {
            PasswordCheck::Match => Ok(true),
            PasswordCheck::Mismatch => Ok(false),
            PasswordCheck::Unparseable => {
                tracing::warn!(
                    "Stored password for '{}' is not an Argon2 hash; rejecting login",
                    username
                );
                Ok(false)
            }
        }
    }

    /// Runs the Argon2 work on the blocking pool. `None` means no account;
    /// the dummy hash is verified in that case and for unparseable rows.
    async fn check_password(&self, password: &str, stored: Option<String>) -> Option<PasswordCheck> {
        let hasher = self.hasher.clone();
        let dummy_hash = self.dummy_hash.clone();
        let password = password.to_string();

        let outcome = tokio::task::spawn_blocking(move || match stored {
            Some(stored) => {
                let check = hasher.verify(&password, &stored);
                if check == PasswordCheck::Unparseable {
                    let _ = hasher.verify(&password, &dummy_hash);
                }
                Some(check)
            }
            None => {
                let _ = hasher.verify(&password, &dummy_hash);
                None
            }
        })
        .await;

        // A panicked hashing task rejects the login.
        outcome.unwrap_or_else(|e| {
            tracing::error!("Password verification task failed: {}", e);
            Some(PasswordCheck::Mismatch)
        })
    }
}
