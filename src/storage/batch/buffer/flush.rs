//! Batch flushing logic.

use crate::error_handling::BatchSaveError;
use crate::record::Record;
use crate::storage::backend::Storage;
use crate::storage::batch::types::FlushResult;

use super::BatchBuffer;

impl<R: Record, S: Storage> BatchBuffer<R, S> {
    /// Writes all staged records to storage as one batch.
    ///
    /// On success the stage and the identity index are cleared together. On
    /// failure both are left untouched and the storage error is returned, so
    /// the same flush can be retried. An empty stage makes no storage call.
    pub async fn flush(&mut self) -> Result<FlushResult, BatchSaveError> {
        if self.slots.is_empty() {
            return Ok(FlushResult::empty(self.mode));
        }

        let count = self.slots.len();
        log::debug!(
            "Flushing batch of {} records to {} ({})",
            count,
            self.shape.table(),
            self.mode
        );

        let rows_affected = self.storage.write(self.mode, self.slots.as_slice()).await?;

        self.slots.clear();
        self.index.clear();
        self.flushes += 1;
        self.records_written += count;

        log::debug!(
            "Flushed {} records to {} ({} rows affected)",
            count,
            self.shape.table(),
            rows_affected
        );

        Ok(FlushResult {
            records: count,
            mode: self.mode,
            rows_affected,
        })
    }

    /// Writes any remaining staged records. Does nothing when the stage is empty.
    pub async fn close(&mut self) -> Result<FlushResult, BatchSaveError> {
        if self.slots.is_empty() {
            return Ok(FlushResult::empty(self.mode));
        }
        self.flush().await
    }
}
