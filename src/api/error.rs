// ==========================================
// spooltrack - API layer error types
// ==========================================
// Translates repository errors into client-facing ones. Every message names
// the offending entity or field so the presentation layer can surface it.
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API-layer error type.
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== client errors =====
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation failed: {message}")]
    ValidationError {
        message: String,
        violations: Vec<FieldViolation>,
    },

    /// Usage amount exceeds what the spool still holds.
    #[error("not enough filament remaining: requested {requested}g, remaining {remaining}g")]
    InsufficientFilament { requested: f64, remaining: f64 },

    // ===== store errors =====
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ===== generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Per-field validation detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} {id} not found"))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("lock acquisition failed: {msg}"))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("unique constraint violation: {msg}"))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("foreign key violation: {msg}"))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result alias for the API layer.
pub type ApiResult<T> = Result<T, ApiError>;
