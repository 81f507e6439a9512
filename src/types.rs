use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of the `chaves` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReleaseCode {
    /// Primary key, supplied by the client
    pub idcodigo: i64,
    /// Business code, unique across records
    pub codigo: String,
    /// In-use flag: "S" or "N"
    pub emuso: Option<String>,
    /// Display name
    pub nome: Option<String>,
    /// Contact email
    pub email: Option<String>,
    pub chave1: Option<String>,
    pub chave2: Option<String>,
    pub chave3: Option<String>,
    /// Opaque hash value
    pub valorhash: Option<String>,
}

/// A validated create body. `idcodigo` stays as received; the datastore
/// casts it and reports a non-numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReleaseCode {
    pub idcodigo: String,
    pub codigo: String,
    pub emuso: String,
    pub nome: String,
    pub email: String,
    pub chave1: String,
    pub chave2: String,
    pub chave3: String,
    pub valorhash: String,
}

/// Mutable columns written by an update. `None` writes NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseCodeChanges {
    pub emuso: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub chave1: Option<String>,
    pub chave2: Option<String>,
    pub chave3: Option<String>,
    pub valorhash: Option<String>,
}

/// Body of `POST /api/chaves`. Fields stay untyped until validation so that
/// missing, null, `false`, `0` and `""` can all be treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateReleaseCodeRequest {
    #[schema(value_type = i64)]
    pub idcodigo: Option<Value>,
    #[schema(value_type = String)]
    pub codigo: Option<Value>,
    #[schema(value_type = String, example = "S")]
    pub emuso: Option<Value>,
    #[schema(value_type = String)]
    pub nome: Option<Value>,
    #[schema(value_type = String, example = "user@example.com")]
    pub email: Option<Value>,
    #[schema(value_type = String)]
    pub chave1: Option<Value>,
    #[schema(value_type = String)]
    pub chave2: Option<Value>,
    #[schema(value_type = String)]
    pub chave3: Option<Value>,
    #[schema(value_type = String)]
    pub valorhash: Option<Value>,
}

/// Body of `PUT /api/chaves/{idcodigo}`. `idcodigo` and `codigo` are not accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateReleaseCodeRequest {
    #[schema(value_type = String, example = "N")]
    pub emuso: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub nome: Option<Value>,
    #[schema(value_type = String, example = "user@example.com")]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub chave1: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub chave2: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub chave3: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub valorhash: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every 4xx response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of every 500 response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InternalErrorResponse {
    pub error: String,
    /// Driver error message
    pub message: String,
    /// Driver error code (SQLSTATE), when one was reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    Ok { timestamp: DateTime<Utc> },
    Error { message: String },
}
