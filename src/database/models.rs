//! Database Models
//!
//! Row types for the resource tables and their tokio-postgres mappings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

/// Employee record managed from the panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub sobrenome: String,
    pub cpf: String,
    pub nivel_permissao_id: i32,
    pub cargo_id: i32,
    pub gerente_id: i32,
    pub data_nascimento: NaiveDate,
    pub data_admissao: NaiveDate,
    pub status: bool,
    pub departamento_id: i32,
}

/// Payload for creating a `Usuario`; the id is assigned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUsuario {
    pub nome: String,
    pub sobrenome: String,
    pub cpf: String,
    pub nivel_permissao_id: i32,
    pub cargo_id: i32,
    pub gerente_id: i32,
    pub data_nascimento: NaiveDate,
    #[serde(alias = "data_adminissao")]
    pub data_admissao: NaiveDate,
    pub status: bool,
    pub departamento_id: i32,
}

impl NewUsuario {
    /// Trims the text fields and rejects blanks, returning the offending field.
    pub fn normalized(mut self) -> Result<Self, &'static str> {
        self.nome = self.nome.trim().to_string();
        self.sobrenome = self.sobrenome.trim().to_string();
        self.cpf = self.cpf.trim().to_string();

        if self.nome.is_empty() {
            return Err("nome");
        }
        if self.sobrenome.is_empty() {
            return Err("sobrenome");
        }
        if self.cpf.is_empty() {
            return Err("cpf");
        }
        Ok(self)
    }

    pub fn into_usuario(self, id: Uuid) -> Usuario {
        Usuario {
            id,
            nome: self.nome,
            sobrenome: self.sobrenome,
            cpf: self.cpf,
            nivel_permissao_id: self.nivel_permissao_id,
            cargo_id: self.cargo_id,
            gerente_id: self.gerente_id,
            data_nascimento: self.data_nascimento,
            data_admissao: self.data_admissao,
            status: self.status,
            departamento_id: self.departamento_id,
        }
    }
}

impl FromRow for Usuario {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            sobrenome: row.try_get("sobrenome")?,
            cpf: row.try_get("cpf")?,
            nivel_permissao_id: row.try_get("nivel_permissao_id")?,
            cargo_id: row.try_get("cargo_id")?,
            gerente_id: row.try_get("gerente_id")?,
            data_nascimento: row.try_get("data_nascimento")?,
            data_admissao: row.try_get("data_admissao")?,
            status: row.try_get("status")?,
            departamento_id: row.try_get("departamento_id")?,
        })
    }
}
