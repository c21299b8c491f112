//! Background batch writer.
//!
//! Moves a [`BatchBuffer`] into a tokio task fed by a channel, so producers
//! on other tasks can hand records over without sharing the buffer. The task
//! flushes whenever the buffer fills, on a timer while records are staged,
//! and one final time when every sender has been dropped.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::config::BatchConfig;
use crate::error_handling::BatchSaveError;
use crate::record::Record;
use crate::storage::backend::Storage;
use crate::storage::batch::buffer::BatchBuffer;
use crate::storage::batch::types::WriterSummary;

/// Starts the batch writer task that processes records from a channel
///
/// Returns a sender that can be used to send records for batching, and a
/// handle resolving to a [`WriterSummary`] once the channel is closed and the
/// last batch is written.
///
/// Storage errors from offers and timed flushes are logged and the task
/// carries on: the buffer keeps every record it was handed, so the next offer
/// or timer tick retries the flush. Records with a mismatched shape are
/// logged and counted in [`WriterSummary::records_rejected`]. An error from
/// the final flush ends the task with that error.
pub fn start_batch_writer<R, S>(
    mut buffer: BatchBuffer<R, S>,
    config: &BatchConfig,
) -> (
    mpsc::UnboundedSender<R>,
    JoinHandle<Result<WriterSummary, BatchSaveError>>,
)
where
    R: Record + 'static,
    S: Storage + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let flush_interval = config.flush_interval();

    let handle = tokio::spawn(async move {
        let mut last_flush = Instant::now();
        let mut interval_timer = interval(flush_interval);
        let mut records_received = 0usize;
        let mut records_rejected = 0usize;
        let flushes_at_start = buffer.flush_count();
        let written_at_start = buffer.records_written();

        loop {
            tokio::select! {
                // Receive a record from the channel
                record = rx.recv() => {
                    match record {
                        Some(record) => {
                            records_received += 1;
                            let flushes_before = buffer.flush_count();
                            match buffer.offer(record).await {
                                Ok(()) => {}
                                Err(e) if e.is_retryable() => {
                                    log::error!(
                                        "Error flushing batch, {} records kept for retry: {}",
                                        buffer.len(),
                                        e
                                    );
                                }
                                Err(e) => {
                                    records_rejected += 1;
                                    log::error!("Record rejected by batch buffer: {}", e);
                                }
                            }
                            if buffer.flush_count() != flushes_before {
                                last_flush = Instant::now();
                            }
                        }
                        None => {
                            // Channel closed, flush remaining records and exit
                            log::info!("Batch writer channel closed, flushing remaining records...");
                            if let Err(e) = buffer.close().await {
                                log::error!("Error flushing final batch: {}", e);
                                return Err(e);
                            }
                            let summary = WriterSummary {
                                records_received,
                                flushes: buffer.flush_count() - flushes_at_start,
                                records_written: buffer.records_written() - written_at_start,
                                records_rejected,
                            };
                            log::info!(
                                "Batch writer shutdown complete: {} records received, {} written in {} flushes, {} rejected",
                                summary.records_received,
                                summary.records_written,
                                summary.flushes,
                                summary.records_rejected
                            );
                            return Ok(summary);
                        }
                    }
                }
                // Periodic flush based on time interval
                _ = interval_timer.tick() => {
                    if last_flush.elapsed() >= flush_interval && !buffer.is_empty() {
                        match buffer.flush().await {
                            Ok(_) => last_flush = Instant::now(),
                            Err(e) => log::error!("Error during periodic flush: {}", e),
                        }
                    }
                }
            }
        }
    });

    (tx, handle)
}
