//! Shared test helpers for storage and buffer tests.
//!
//! Provides an in-memory SQLite pool and a [`RecordingStorage`] that keeps
//! every batch it receives and can be told to fail.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::record::{Record, Value};
use crate::storage::backend::{Storage, WriteMode};

/// Creates an in-memory test database pool.
///
/// Limited to one connection so every query sees the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// One batch as received by [`RecordingStorage`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub mode: WriteMode,
    pub rows: Vec<Vec<Value>>,
}

/// Storage double that records batches. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    batches: Arc<Mutex<Vec<RecordedBatch>>>,
    failures_left: Arc<AtomicUsize>,
}

impl RecordingStorage {
    /// Makes the next `n` writes fail without recording anything.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }

    fn record<R: Record>(&self, mode: WriteMode, records: &[R]) -> Result<u64, DatabaseError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DatabaseError::SqlError(sqlx::Error::PoolTimedOut));
        }
        let rows: Vec<Vec<Value>> = records.iter().map(|r| r.values()).collect();
        let count = rows.len() as u64;
        self.batches.lock().unwrap().push(RecordedBatch { mode, rows });
        Ok(count)
    }
}

impl Storage for RecordingStorage {
    async fn upsert<R: Record>(&self, records: &[R]) -> Result<u64, DatabaseError> {
        self.record(WriteMode::Upsert, records)
    }

    async fn insert<R: Record>(&self, records: &[R]) -> Result<u64, DatabaseError> {
        self.record(WriteMode::Insert, records)
    }
}
