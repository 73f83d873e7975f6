use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use thiserror::Error;

/// Domain error kinds raised by the catalog services
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DatabaseConflict(String),

    /// Unclassified persistence failure, propagated as-is
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl CatalogError {
    pub fn not_found(kind: &str, id: i64) -> Self {
        CatalogError::NotFound(format!("{kind} not found: {id}"))
    }

    /// Classifies the failure of a gateway delete.
    pub fn from_delete(kind: &str, err: DatabaseError) -> Self {
        match err {
            DatabaseError::NothingDeleted { id } => Self::not_found(kind, id),
            DatabaseError::IntegrityViolation(details) => {
                tracing::debug!(%details, "Delete blocked by a constraint");
                CatalogError::DatabaseConflict("Integrity violation".to_string())
            }
            other => CatalogError::Database(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(msg) => AppError::NotFound(msg),
            CatalogError::DatabaseConflict(msg) => AppError::DatabaseConflict(msg),
            CatalogError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
