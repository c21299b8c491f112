//! Error handling.
//!
//! Error types are split by layer:
//! - **BatchSaveError**: returned by buffer operations (shape, capacity, storage)
//! - **DatabaseError**: reported by the storage layer
//! - **InitializationError**: logger setup failures

mod types;

// Re-export public API
pub use types::{BatchSaveError, DatabaseError, InitializationError};
