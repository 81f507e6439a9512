//! Datastore access for the `chaves` table.
//!
//! Handlers only see the [`ReleaseCodeStore`] trait. [`PostgresStore`] is the
//! production backend; [`InMemoryStore`] backs local runs and tests.
//!
//! Statements are independent and non-transactional. The uniqueness check on
//! `codigo` before an insert can race with a concurrent insert of the same code.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{NewReleaseCode, ReleaseCode, ReleaseCodeChanges};

/// Errors reported by a datastore backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The database rejected or failed a statement.
    #[error("{message}")]
    Query {
        message: String,
        /// SQLSTATE reported by the server
        code: Option<String>,
    },

    /// The pool or the connection failed before a result was produced.
    #[error("{0}")]
    Connection(String),
}

impl StoreError {
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Query { code, .. } => code.as_deref(),
            StoreError::Connection(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::Query {
                message: db_err.message().to_string(),
                code: db_err.code().map(|code| code.into_owned()),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
            other => StoreError::Query {
                message: other.to_string(),
                code: None,
            },
        }
    }
}

/// Ids reach the store as the text the client sent. Backends cast them and
/// report a non-numeric id as a `Query` error with SQLSTATE `22P02`.
#[async_trait]
pub trait ReleaseCodeStore: Send + Sync {
    /// Trivial liveness query.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Every record, ascending by `idcodigo`.
    async fn list_all(&self) -> Result<Vec<ReleaseCode>, StoreError>;

    async fn find_by_id(&self, idcodigo: &str) -> Result<Option<ReleaseCode>, StoreError>;

    async fn find_by_codigo(&self, codigo: &str) -> Result<Option<ReleaseCode>, StoreError>;

    /// All records sharing an email address. Email is not unique.
    async fn find_by_email(&self, email: &str) -> Result<Vec<ReleaseCode>, StoreError>;

    async fn codigo_exists(&self, codigo: &str) -> Result<bool, StoreError>;

    /// Inserts the record and returns the stored row.
    async fn insert(&self, record: &NewReleaseCode) -> Result<ReleaseCode, StoreError>;

    /// Rewrites the mutable columns. Returns `None` when no row matched.
    async fn update(
        &self,
        idcodigo: &str,
        changes: &ReleaseCodeChanges,
    ) -> Result<Option<ReleaseCode>, StoreError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, idcodigo: &str) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_pool_errors_have_no_code() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Connection(_)));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_sqlx_decode_errors_keep_message() {
        let err = StoreError::from(sqlx::Error::ColumnNotFound("valorhash".into()));
        assert!(err.to_string().contains("valorhash"));
        assert_eq!(err.code(), None);
    }
}
