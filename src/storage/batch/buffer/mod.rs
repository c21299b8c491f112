//! Deduplicating batch buffer.
//!
//! [`BatchBuffer`] stages records of one shape until `capacity` distinct
//! records are held, then writes them to storage in one batch. Records with
//! the same identity key replace each other in place, so a batch holds at
//! most one record per key and the last one offered wins.

mod flush;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BatchConfig;
use crate::error_handling::BatchSaveError;
use crate::record::{identity_key, Record, Shape};
use crate::storage::backend::{Storage, WriteMode};

/// Stages records of one shape and writes them to storage in batches.
///
/// The buffer is driven by a single owner; it holds no locks. Call
/// [`BatchBuffer::close`] after the last offer, otherwise a partially filled
/// batch is never written.
pub struct BatchBuffer<R: Record, S: Storage> {
    shape: Arc<Shape>,
    storage: S,
    mode: WriteMode,
    capacity: usize,
    slots: Vec<R>,
    /// Identity key -> slot, for the current batch only
    index: HashMap<String, usize>,
    flushes: usize,
    records_written: usize,
}

impl<R: Record, S: Storage> BatchBuffer<R, S> {
    /// Creates a buffer for records of `shape`, flushing every `capacity`
    /// distinct records.
    ///
    /// Shapes with identity columns are written with upserts, shapes without
    /// any are appended with plain inserts.
    ///
    /// # Errors
    ///
    /// Returns `BatchSaveError::InvalidCapacity` if `capacity` is zero.
    pub fn new(
        shape: impl Into<Arc<Shape>>,
        storage: S,
        capacity: usize,
    ) -> Result<Self, BatchSaveError> {
        if capacity == 0 {
            return Err(BatchSaveError::InvalidCapacity);
        }
        let shape = shape.into();
        let mode = if shape.has_identity() {
            WriteMode::Upsert
        } else {
            WriteMode::Insert
        };
        Ok(BatchBuffer {
            shape,
            storage,
            mode,
            capacity,
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            flushes: 0,
            records_written: 0,
        })
    }

    /// Creates a buffer sized from a validated [`BatchConfig`].
    pub fn with_config(
        shape: impl Into<Arc<Shape>>,
        storage: S,
        config: &BatchConfig,
    ) -> Result<Self, BatchSaveError> {
        config.validate()?;
        Self::new(shape, storage, config.batch_size)
    }

    /// Stages one record.
    ///
    /// A record whose identity key is already staged replaces the staged
    /// record in its slot. Any other record takes a new slot; when the stage
    /// then holds `capacity` or more records, the batch is flushed and a flush
    /// error is returned from here.
    ///
    /// A record is always staged before the flush is attempted, so after a
    /// `StorageFailure` it is written by the next successful flush and must
    /// not be offered again. While storage keeps failing the stage grows past
    /// `capacity`, and every offer that takes a new slot retries the flush.
    ///
    /// # Errors
    ///
    /// - `BatchSaveError::TypeMismatch` if the record's shape or value count
    ///   differs from the buffer's shape. The record is not staged.
    /// - `BatchSaveError::StorageFailure` if an automatic flush fails
    pub async fn offer(&mut self, record: R) -> Result<(), BatchSaveError> {
        self.check_shape(&record)?;
        let values = record.values();
        if values.len() != self.shape.columns().len() {
            return Err(BatchSaveError::TypeMismatch {
                expected: self.shape.to_string(),
                found: format!("{} values", values.len()),
            });
        }

        let key = identity_key(&self.shape, &values);
        if let Some(&slot) = key.as_ref().and_then(|k| self.index.get(k)) {
            log::trace!("Replacing staged record in slot {} of {}", slot, self.shape.table());
            self.slots[slot] = record;
            return Ok(());
        }

        if let Some(key) = key {
            self.index.insert(key, self.slots.len());
        }
        self.slots.push(record);

        // Over capacity only after earlier automatic flushes failed
        if self.slots.len() >= self.capacity {
            if self.slots.len() > self.capacity {
                log::debug!(
                    "Retrying pending batch of {} records to {}",
                    self.slots.len(),
                    self.shape.table()
                );
            }
            self.flush().await?;
        }
        Ok(())
    }

    fn check_shape(&self, record: &R) -> Result<(), BatchSaveError> {
        let shape = record.shape();
        if std::ptr::eq(shape, Arc::as_ptr(&self.shape)) || *shape == *self.shape {
            Ok(())
        } else {
            Err(BatchSaveError::TypeMismatch {
                expected: self.shape.to_string(),
                found: shape.to_string(),
            })
        }
    }

    /// Number of staged records.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Strategy every batch of this buffer is written with.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Staged records in slot order.
    pub fn staged(&self) -> &[R] {
        &self.slots
    }

    /// Successful flushes since the buffer was created.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Records written by successful flushes since the buffer was created.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
