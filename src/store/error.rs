use thiserror::Error;

/// Errors produced by a [`StorageBackend`](super::StorageBackend) or while
/// (de)serializing a collection blob.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
