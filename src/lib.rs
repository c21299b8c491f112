//! batch_save library: batched, deduplicating writes of records into SQLite
//!
//! Records are offered one at a time to a [`BatchBuffer`]. Records that share
//! an identity key within one batch collapse into the last one offered, and
//! full batches are written to storage in a single insert-or-update
//! statement group. Record types without identity columns are appended with
//! plain inserts.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use batch_save::record::{Field, Row, Shape};
//! use batch_save::{init_db_pool_with_path, BatchBuffer, SqliteStorage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_path(std::path::Path::new("rules.db")).await?;
//! let shape = Arc::new(Shape::new(
//!     "transformation_rules",
//!     vec![Field::primary_key("name"), Field::column("pattern")],
//! )?);
//!
//! let mut buffer = BatchBuffer::new(shape.clone(), SqliteStorage::new(pool), 500)?;
//! buffer
//!     .offer(Row::new(shape.clone(), vec!["bugs".into(), "^BUG-".into()])?)
//!     .await?;
//! buffer
//!     .offer(Row::new(shape.clone(), vec!["bugs".into(), "^DEFECT-".into()])?)
//!     .await?;
//!
//! // One row is written: ("bugs", "^DEFECT-")
//! buffer.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Buffer operations are async and must run inside a Tokio runtime.

pub mod config;
mod error_handling;
pub mod initialization;
pub mod record;
pub mod storage;

// Re-export public API
pub use config::{BatchConfig, LogFormat, LogLevel};
pub use error_handling::{BatchSaveError, DatabaseError, InitializationError};
pub use record::{Record, Row, Shape, Value};
pub use storage::{
    init_db_pool, init_db_pool_with_path, start_batch_writer, BatchBuffer, FlushResult,
    SqliteStorage, Storage, WriteMode, WriterSummary,
};
