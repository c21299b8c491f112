// storage/mod.rs
// Storage backends for flushed batches

pub mod backend;
pub mod batch;
pub mod pool;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use backend::{Storage, WriteMode};
pub use batch::{start_batch_writer, BatchBuffer, FlushResult, WriterSummary};
pub use pool::{init_db_pool, init_db_pool_with_path};
pub use sqlite::SqliteStorage;
