//! Store errors

use edc_core::traits::Id;
use edc_core::EdcError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: Id },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for EdcError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => EdcError::not_found("Document", "id", id),
            other => {
                tracing::error!(error = %other, "store operation failed");
                EdcError::Store(other.to_string())
            }
        }
    }
}
