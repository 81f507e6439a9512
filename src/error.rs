use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::constants::{MSG_CODE_EXISTS, MSG_INTERNAL_ERROR, MSG_NOT_FOUND};
use crate::store::StoreError;
use crate::types::{ErrorResponse, InternalErrorResponse};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Record not found")]
    NotFound,

    #[error("Code already exists")]
    Conflict,

    #[error("Datastore error: {message}")]
    Datastore {
        message: String,
        code: Option<String>,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Datastore { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let client_message = match self {
            AppError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                msg
            }
            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                msg
            }
            AppError::NotFound => MSG_NOT_FOUND.to_string(),
            AppError::Conflict => {
                warn!("Duplicate codigo rejected");
                MSG_CODE_EXISTS.to_string()
            }
            AppError::Datastore { message, code } => {
                error!(code = ?code, "Datastore error: {}", message);
                let body = Json(InternalErrorResponse {
                    error: MSG_INTERNAL_ERROR.to_string(),
                    message,
                    code,
                });
                return (status, body).into_response();
            }
        };

        (status, Json(ErrorResponse { error: client_message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Datastore {
            code: err.code().map(str::to_string),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
