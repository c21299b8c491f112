// Shared test helpers for buffer and storage tests.
//
// Provides a recording storage double, a statically shaped record type with
// an embedded sub-structure, and SQLite pool setup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use batch_save::record::Field;
use batch_save::{DatabaseError, Record, Shape, Storage, Value, WriteMode};

/// One batch as received by [`RecordingStorage`].
#[allow(dead_code)] // Used by other test files
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub mode: WriteMode,
    pub rows: Vec<Vec<Value>>,
}

/// Storage double that records every batch. Clones share state.
#[allow(dead_code)] // Used by other test files
#[derive(Clone, Default)]
pub struct RecordingStorage {
    batches: Arc<Mutex<Vec<RecordedBatch>>>,
    calls: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
}

#[allow(dead_code)] // Used by other test files
impl RecordingStorage {
    /// Makes the next `n` writes fail without recording a batch.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    /// Successful batches, in the order they were written.
    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }

    /// Every write attempt, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record<R: Record>(&self, mode: WriteMode, records: &[R]) -> Result<u64, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
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

/// Columns shared by every tool-layer table.
#[allow(dead_code)] // Used by other test files
#[derive(Debug, Clone, PartialEq)]
pub struct CommonModel {
    pub created_at: i64,
    pub updated_at: i64,
}

/// A connector transformation rule, identified by connection and name.
///
/// `connection_id` sits inside the embedded `Scope` structure, so the
/// identity spans a nested and a top-level field.
#[allow(dead_code)] // Used by other test files
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationRule {
    pub model: CommonModel,
    pub scope: RuleScope,
    pub name: String,
    pub commit_sha_pattern: String,
    pub type_mappings: Option<String>,
}

#[allow(dead_code)] // Used by other test files
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScope {
    pub connection_id: i64,
}

#[allow(dead_code)] // Used by other test files
pub fn rule_shape() -> &'static Shape {
    static SHAPE: OnceLock<Shape> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Shape::new(
            "_tool_transformation_rules",
            vec![
                Field::embedded(
                    "Model",
                    vec![Field::column("created_at"), Field::column("updated_at")],
                ),
                Field::embedded("Scope", vec![Field::primary_key("connection_id")]),
                Field::primary_key("name"),
                Field::column("commit_sha_pattern"),
                Field::column("type_mappings"),
            ],
        )
        .expect("rule shape is valid")
    })
}

impl Record for TransformationRule {
    fn shape(&self) -> &Shape {
        rule_shape()
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.model.created_at.into(),
            self.model.updated_at.into(),
            self.scope.connection_id.into(),
            self.name.as_str().into(),
            self.commit_sha_pattern.as_str().into(),
            self.type_mappings.clone().into(),
        ]
    }
}

#[allow(dead_code)] // Used by other test files
pub fn rule(connection_id: i64, name: &str, pattern: &str) -> TransformationRule {
    TransformationRule {
        model: CommonModel {
            created_at: 1704067200000,
            updated_at: 1704067200000,
        },
        scope: RuleScope { connection_id },
        name: name.to_string(),
        commit_sha_pattern: pattern.to_string(),
        type_mappings: None,
    }
}

/// Creates an in-memory test database pool with the rules table.
///
/// Limited to one connection so every query sees the same in-memory database.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    create_rules_table(&pool).await;
    pool
}

#[allow(dead_code)] // Used by other test files
pub async fn create_rules_table(pool: &SqlitePool) {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _tool_transformation_rules (
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            connection_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            commit_sha_pattern TEXT NOT NULL,
            type_mappings TEXT,
            PRIMARY KEY (connection_id, name)
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create rules table");
}
