//! `PostgreSQL` backend.
//!
//! The schema is managed outside this service:
//!
//! ```sql
//! CREATE TABLE chaves (
//!     idcodigo  INTEGER PRIMARY KEY,
//!     codigo    VARCHAR NOT NULL,
//!     emuso     CHAR(1),
//!     nome      VARCHAR,
//!     email     VARCHAR,
//!     chave1    VARCHAR,
//!     chave2    VARCHAR,
//!     chave3    VARCHAR,
//!     valorhash VARCHAR
//! );
//! ```

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use super::{ReleaseCodeStore, StoreError};
use crate::config::DatabaseConfig;
use crate::types::{NewReleaseCode, ReleaseCode, ReleaseCodeChanges};

// `idcodigo` is widened so INTEGER and BIGINT columns both decode into i64.
// Id parameters are bound as text and cast by the server.
const SELECT_ALL: &str = "SELECT idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash FROM chaves ORDER BY idcodigo ASC";

const SELECT_BY_ID: &str = "SELECT idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash FROM chaves WHERE idcodigo = $1::BIGINT";

const SELECT_BY_CODIGO: &str = "SELECT idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash FROM chaves WHERE codigo = $1";

const SELECT_BY_EMAIL: &str = "SELECT idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash FROM chaves WHERE email = $1";

const INSERT: &str = "INSERT INTO chaves \
     (idcodigo, codigo, emuso, nome, email, chave1, chave2, chave3, valorhash) \
     VALUES ($1::BIGINT, $2, $3, $4, $5, $6, $7, $8, $9) \
     RETURNING idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash";

const UPDATE: &str = "UPDATE chaves SET emuso = $1, nome = $2, email = $3, \
     chave1 = $4, chave2 = $5, chave3 = $6, valorhash = $7 WHERE idcodigo = $8::BIGINT \
     RETURNING idcodigo::BIGINT AS idcodigo, codigo, emuso, nome, email, \
     chave1, chave2, chave3, valorhash";

const DELETE: &str = "DELETE FROM chaves WHERE idcodigo = $1::BIGINT";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool from `DATABASE_URL` when set, otherwise from the
    /// standard `PG*` environment variables.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = match &config.url {
            Some(url) => url.parse::<PgConnectOptions>()?,
            None => PgConnectOptions::new(),
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            max_connections = config.max_connections,
            "PostgreSQL pool established"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ReleaseCodeStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ReleaseCode>, StoreError> {
        let rows = sqlx::query_as::<_, ReleaseCode>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, idcodigo: &str) -> Result<Option<ReleaseCode>, StoreError> {
        let row = sqlx::query_as::<_, ReleaseCode>(SELECT_BY_ID)
            .bind(idcodigo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_codigo(&self, codigo: &str) -> Result<Option<ReleaseCode>, StoreError> {
        let row = sqlx::query_as::<_, ReleaseCode>(SELECT_BY_CODIGO)
            .bind(codigo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ReleaseCode>, StoreError> {
        let rows = sqlx::query_as::<_, ReleaseCode>(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn codigo_exists(&self, codigo: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM chaves WHERE codigo = $1)")
                .bind(codigo)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, record: &NewReleaseCode) -> Result<ReleaseCode, StoreError> {
        let row = sqlx::query_as::<_, ReleaseCode>(INSERT)
            .bind(&record.idcodigo)
            .bind(&record.codigo)
            .bind(&record.emuso)
            .bind(&record.nome)
            .bind(&record.email)
            .bind(&record.chave1)
            .bind(&record.chave2)
            .bind(&record.chave3)
            .bind(&record.valorhash)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        idcodigo: &str,
        changes: &ReleaseCodeChanges,
    ) -> Result<Option<ReleaseCode>, StoreError> {
        let row = sqlx::query_as::<_, ReleaseCode>(UPDATE)
            .bind(&changes.emuso)
            .bind(&changes.nome)
            .bind(&changes.email)
            .bind(&changes.chave1)
            .bind(&changes.chave2)
            .bind(&changes.chave3)
            .bind(&changes.valorhash)
            .bind(idcodigo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, idcodigo: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(DELETE)
            .bind(idcodigo)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
