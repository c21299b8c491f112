//! Storage backend contract.

use std::future::Future;

use strum_macros::{AsRefStr, Display};

use crate::error_handling::DatabaseError;
use crate::record::Record;

/// How a batch is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum WriteMode {
    /// Insert, overwriting every column of rows whose identity already exists.
    Upsert,
    /// Plain append.
    Insert,
}

/// A store that persists batches of same-shaped records.
///
/// Both operations receive a non-empty slice of records sharing one shape and
/// must either commit all of them or none, returning the number of rows
/// affected.
pub trait Storage: Send + Sync {
    /// Inserts `records`, overwriting all columns of rows that conflict on
    /// the shape's identity columns.
    fn upsert<R: Record>(
        &self,
        records: &[R],
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;

    /// Appends `records` without conflict handling.
    fn insert<R: Record>(
        &self,
        records: &[R],
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;

    /// Dispatches to [`Storage::upsert`] or [`Storage::insert`].
    fn write<R: Record>(
        &self,
        mode: WriteMode,
        records: &[R],
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send {
        async move {
            match mode {
                WriteMode::Upsert => self.upsert(records).await,
                WriteMode::Insert => self.insert(records).await,
            }
        }
    }
}
