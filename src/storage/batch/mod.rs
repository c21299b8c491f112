//! Batched, deduplicating writes.
//!
//! This module provides the [`BatchBuffer`] that stages records and flushes
//! them to a [`Storage`](crate::storage::Storage), and a background writer
//! task that drives a buffer from a channel.

mod buffer;
mod types;
mod writer;

pub use buffer::BatchBuffer;
pub use types::{FlushResult, WriterSummary};
pub use writer::start_batch_writer;
