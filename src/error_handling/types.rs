//! Error type definitions.
//!
//! This module defines the error types surfaced by the buffer, the storage
//! layer, and logger initialization.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Errors returned by [`BatchBuffer`](crate::BatchBuffer) operations.
#[derive(Error, Debug)]
pub enum BatchSaveError {
    /// The record shape descriptor is unusable (no table, no columns, duplicate columns).
    #[error("Invalid record shape: {0}")]
    InvalidShape(String),

    /// A buffer must be able to stage at least one record.
    #[error("Batch capacity must be at least 1")]
    InvalidCapacity,

    /// A batch configuration value is out of range.
    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(String),

    /// An offered record does not have the shape the buffer was built for.
    #[error("Record shape mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the buffer's shape.
        expected: String,
        /// Description of the offered record's shape.
        found: String,
    },

    /// The storage layer rejected a flush. Staged records, including one
    /// being offered when the flush failed, are kept for a retry.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DatabaseError),
}

impl BatchSaveError {
    /// Returns true when nothing was lost: the records involved are staged and
    /// the next `flush`, `close` or new-slot `offer` writes them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BatchSaveError::StorageFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_wraps_database_error() {
        let err: BatchSaveError = DatabaseError::SqlError(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(
            err,
            BatchSaveError::StorageFailure(DatabaseError::SqlError(sqlx::Error::PoolTimedOut))
        ));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("Storage failure: SQL error:"));
    }

    #[test]
    fn test_shape_errors_not_retryable() {
        assert!(!BatchSaveError::InvalidCapacity.is_retryable());
        assert!(!BatchSaveError::InvalidShape("no columns".into()).is_retryable());
        let mismatch = BatchSaveError::TypeMismatch {
            expected: "rules(id, name)".into(),
            found: "users(id)".into(),
        };
        assert!(!mismatch.is_retryable());
        assert_eq!(
            mismatch.to_string(),
            "Record shape mismatch: expected rules(id, name), found users(id)"
        );
    }
}
