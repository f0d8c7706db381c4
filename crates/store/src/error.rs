use thiserror::Error;

use crate::EntityId;

/// Errors that can occur when reading or writing clinic records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An update targeted an owner row that does not exist.
    #[error("Owner {0} does not exist")]
    MissingOwner(EntityId),

    /// The backing store cannot serve requests.
    #[error("{0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
