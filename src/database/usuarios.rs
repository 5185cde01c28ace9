//! Usuario Repository
//!
//! CRUD access to `staging.usuarios`.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::database::models::{FromRow, NewUsuario, Usuario};
use crate::error::StorageError;

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn create(&self, new: NewUsuario) -> Result<Usuario, StorageError>;
    async fn get(&self, id: Uuid) -> Result<Option<Usuario>, StorageError>;
    async fn list(&self) -> Result<Vec<Usuario>, StorageError>;
}

#[derive(Clone)]
pub struct PgUsuarioRepository {
    pool: Pool,
}

impl PgUsuarioRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, StorageError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(format!("pool checkout: {}", e)))
    }
}

fn query_error(context: &str, e: tokio_postgres::Error) -> StorageError {
    StorageError::Unavailable(format!("{}: {}", context, e))
}

#[async_trait]
impl UsuarioRepository for PgUsuarioRepository {
    async fn create(&self, new: NewUsuario) -> Result<Usuario, StorageError> {
        let usuario = new.into_usuario(Uuid::new_v4());
        let client = self.client().await?;
        let row = client
            .query_one(
                "INSERT INTO staging.usuarios \
                 (id, nome, sobrenome, cpf, nivel_permissao_id, cargo_id, gerente_id, \
                  data_nascimento, data_admissao, status, departamento_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 RETURNING *",
                &[
                    &usuario.id,
                    &usuario.nome,
                    &usuario.sobrenome,
                    &usuario.cpf,
                    &usuario.nivel_permissao_id,
                    &usuario.cargo_id,
                    &usuario.gerente_id,
                    &usuario.data_nascimento,
                    &usuario.data_admissao,
                    &usuario.status,
                    &usuario.departamento_id,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    StorageError::Conflict(format!("cpf {} already registered", usuario.cpf))
                } else {
                    query_error("insert usuario", e)
                }
            })?;
        Usuario::from_row(&row).map_err(|e| query_error("decode usuario", e))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Usuario>, StorageError> {
        let client = self.client().await?;
        let row = client
            .query_opt("SELECT * FROM staging.usuarios WHERE id = $1", &[&id])
            .await
            .map_err(|e| query_error("select usuario", e))?;
        row.map(|r| Usuario::from_row(&r))
            .transpose()
            .map_err(|e| query_error("decode usuario", e))
    }

    async fn list(&self) -> Result<Vec<Usuario>, StorageError> {
        let client = self.client().await?;
        let rows = client
            .query("SELECT * FROM staging.usuarios ORDER BY nome, sobrenome", &[])
            .await
            .map_err(|e| query_error("list usuarios", e))?;
        rows.iter()
            .map(Usuario::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| query_error("decode usuario", e))
    }
}
