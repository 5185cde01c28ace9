//! In-memory stand-ins for the Postgres-backed stores, used by unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::database::credentials::CredentialStore;
use crate::database::models::{NewUsuario, Usuario};
use crate::database::usuarios::UsuarioRepository;
use crate::error::StorageError;

pub struct InMemoryCredentialStore {
    hasher: PasswordHasher,
    accounts: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new(hasher: &PasswordHasher) -> Self {
        Self {
            hasher: hasher.clone(),
            accounts: HashMap::new(),
        }
    }

    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        let hash = self.hasher.hash(password).unwrap();
        self.accounts.insert(username.to_string(), hash);
        self
    }

    /// Stores `stored` verbatim, e.g. a legacy plaintext password.
    pub fn with_raw(mut self, username: &str, stored: &str) -> Self {
        self.accounts.insert(username.to_string(), stored.to_string());
        self
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn password_hash(&self, username: &str) -> Result<Option<String>, StorageError> {
        Ok(self.accounts.get(username).cloned())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

pub struct FailingStore;

#[async_trait]
impl CredentialStore for FailingStore {
    async fn password_hash(&self, _username: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

pub struct SlowStore(pub Duration);

#[async_trait]
impl CredentialStore for SlowStore {
    async fn password_hash(&self, _username: &str) -> Result<Option<String>, StorageError> {
        tokio::time::sleep(self.0).await;
        Ok(None)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsuarioRepository {
    rows: Mutex<Vec<Usuario>>,
}

#[async_trait]
impl UsuarioRepository for InMemoryUsuarioRepository {
    async fn create(&self, new: NewUsuario) -> Result<Usuario, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.cpf == new.cpf) {
            return Err(StorageError::Conflict(format!("cpf {} already registered", new.cpf)));
        }
        let usuario = new.into_usuario(Uuid::new_v4());
        rows.push(usuario.clone());
        Ok(usuario)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Usuario>, StorageError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Usuario>, StorageError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| (&a.nome, &a.sobrenome).cmp(&(&b.nome, &b.sobrenome)));
        Ok(rows)
    }
}
