//! In-memory backend for local runs and tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ReleaseCodeStore, StoreError};
use crate::types::{NewReleaseCode, ReleaseCode, ReleaseCodeChanges};

/// SQLSTATE for a unique constraint violation
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for text that does not parse as the column type
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Casts an id the way the database does for a BIGINT column.
fn parse_id(idcodigo: &str) -> Result<i64, StoreError> {
    idcodigo.trim().parse().map_err(|_| StoreError::Query {
        message: format!("invalid input syntax for type bigint: \"{idcodigo}\""),
        code: Some(INVALID_TEXT_REPRESENTATION.to_string()),
    })
}

/// Records keyed by `idcodigo`, so iteration is already in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<i64, ReleaseCode>>>,
    failure: Option<StoreError>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `error`.
    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReleaseCodeStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn list_all(&self) -> Result<Vec<ReleaseCode>, StoreError> {
        self.check()?;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, idcodigo: &str) -> Result<Option<ReleaseCode>, StoreError> {
        self.check()?;
        let idcodigo = parse_id(idcodigo)?;
        Ok(self.records.read().await.get(&idcodigo).cloned())
    }

    async fn find_by_codigo(&self, codigo: &str) -> Result<Option<ReleaseCode>, StoreError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.codigo == codigo).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ReleaseCode>, StoreError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn codigo_exists(&self, codigo: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_codigo(codigo).await?.is_some())
    }

    async fn insert(&self, new: &NewReleaseCode) -> Result<ReleaseCode, StoreError> {
        self.check()?;
        let record = ReleaseCode {
            idcodigo: parse_id(&new.idcodigo)?,
            codigo: new.codigo.clone(),
            emuso: Some(new.emuso.clone()),
            nome: Some(new.nome.clone()),
            email: Some(new.email.clone()),
            chave1: Some(new.chave1.clone()),
            chave2: Some(new.chave2.clone()),
            chave3: Some(new.chave3.clone()),
            valorhash: Some(new.valorhash.clone()),
        };

        let mut records = self.records.write().await;
        if records.contains_key(&record.idcodigo) {
            return Err(StoreError::Query {
                message: "duplicate key value violates unique constraint \"chaves_pkey\""
                    .to_string(),
                code: Some(UNIQUE_VIOLATION.to_string()),
            });
        }
        records.insert(record.idcodigo, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        idcodigo: &str,
        changes: &ReleaseCodeChanges,
    ) -> Result<Option<ReleaseCode>, StoreError> {
        self.check()?;
        let idcodigo = parse_id(idcodigo)?;
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&idcodigo) else {
            return Ok(None);
        };
        record.emuso = changes.emuso.clone();
        record.nome = changes.nome.clone();
        record.email = changes.email.clone();
        record.chave1 = changes.chave1.clone();
        record.chave2 = changes.chave2.clone();
        record.chave3 = changes.chave3.clone();
        record.valorhash = changes.valorhash.clone();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, idcodigo: &str) -> Result<bool, StoreError> {
        self.check()?;
        let idcodigo = parse_id(idcodigo)?;
        Ok(self.records.write().await.remove(&idcodigo).is_some())
    }
}
