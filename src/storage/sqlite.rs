//! SQLite storage backend.
//!
//! Batches are written as multi-row `INSERT` statements built with
//! `sqlx::QueryBuilder`. Upserts add an `ON CONFLICT (...) DO UPDATE SET`
//! clause that overwrites every non-identity column with the incoming value.
//! A batch is split into statements that stay under
//! [`SQLITE_MAX_VARIABLES`] bound parameters, and all statements of one batch
//! run in a single transaction.

use sqlx::query_builder::Separated;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::SQLITE_MAX_VARIABLES;
use crate::error_handling::DatabaseError;
use crate::record::{Record, Shape, Value};

use super::backend::{Storage, WriteMode};

/// [`Storage`] implementation over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStorage { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn write_batch<R: Record>(
        &self,
        records: &[R],
        mode: WriteMode,
    ) -> Result<u64, DatabaseError> {
        let Some(first) = records.first() else {
            return Ok(0);
        };
        let shape = first.shape();
        let head = insert_head(shape);
        let tail = match mode {
            WriteMode::Upsert => conflict_clause(shape),
            WriteMode::Insert => None,
        };
        let rows_per_statement = rows_per_statement(shape.columns().len());

        log::debug!(
            "Writing {} records to {} ({}, {} rows per statement)",
            records.len(),
            shape.table(),
            mode,
            rows_per_statement
        );

        let mut tx = self.pool.begin().await?;
        let mut rows_affected = 0;
        for chunk in records.chunks(rows_per_statement) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(head.as_str());
            builder.push_values(chunk, |mut row, record| {
                for value in record.values() {
                    push_value(&mut row, value);
                }
            });
            if let Some(tail) = &tail {
                builder.push(tail);
            }

            let result = builder.build().execute(&mut *tx).await.map_err(|e| {
                log::error!("Failed to {} batch into {}: {}", mode, shape.table(), e);
                DatabaseError::SqlError(e)
            })?;
            rows_affected += result.rows_affected();
        }
        tx.commit().await?;

        Ok(rows_affected)
    }
}

impl Storage for SqliteStorage {
    async fn upsert<R: Record>(&self, records: &[R]) -> Result<u64, DatabaseError> {
        self.write_batch(records, WriteMode::Upsert).await
    }

    async fn insert<R: Record>(&self, records: &[R]) -> Result<u64, DatabaseError> {
        self.write_batch(records, WriteMode::Insert).await
    }
}

fn push_value(row: &mut Separated<'_, '_, Sqlite, &'static str>, value: Value) {
    match value {
        Value::Null => row.push_bind(None::<String>),
        Value::Integer(v) => row.push_bind(v),
        Value::Real(v) => row.push_bind(v),
        Value::Text(v) => row.push_bind(v),
        Value::Blob(v) => row.push_bind(v),
        Value::Bool(v) => row.push_bind(v),
    };
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.map(quote_ident).collect::<Vec<_>>().join(", ")
}

/// `INSERT INTO "table" ("a", "b") `, ready for a `VALUES` list.
pub(crate) fn insert_head(shape: &Shape) -> String {
    format!(
        "INSERT INTO {} ({}) ",
        quote_ident(shape.table()),
        column_list(shape.columns().iter().map(|c| c.name.as_str()))
    )
}

/// The `ON CONFLICT` clause for an upsert, or `None` for identity-less shapes.
///
/// Every non-identity column is overwritten. When all columns belong to the
/// identity there is nothing to overwrite and conflicts are ignored.
pub(crate) fn conflict_clause(shape: &Shape) -> Option<String> {
    if !shape.has_identity() {
        return None;
    }
    let target = column_list(shape.identity_columns().map(|c| c.name.as_str()));
    let updates: Vec<String> = shape
        .columns()
        .iter()
        .filter(|c| !c.primary_key)
        .map(|c| {
            let col = quote_ident(&c.name);
            format!("{}=excluded.{}", col, col)
        })
        .collect();

    if updates.is_empty() {
        Some(format!(" ON CONFLICT({}) DO NOTHING", target))
    } else {
        Some(format!(
            " ON CONFLICT({}) DO UPDATE SET {}",
            target,
            updates.join(", ")
        ))
    }
}

pub(crate) fn rows_per_statement(columns: usize) -> usize {
    (SQLITE_MAX_VARIABLES / columns.max(1)).max(1)
}
