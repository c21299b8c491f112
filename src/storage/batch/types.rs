//! Batch result types.

use crate::storage::backend::WriteMode;

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushResult {
    /// Records handed to storage. Zero when nothing was staged.
    pub records: usize,
    /// Strategy the batch was written with.
    pub mode: WriteMode,
    /// Rows the storage layer reported as affected.
    pub rows_affected: u64,
}

impl FlushResult {
    pub(crate) fn empty(mode: WriteMode) -> Self {
        FlushResult {
            records: 0,
            mode,
            rows_affected: 0,
        }
    }
}

/// Totals reported by the background writer when it shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterSummary {
    /// Records received over the channel, including overwrites.
    pub records_received: usize,
    /// Successful flushes, automatic, timed, and final.
    pub flushes: usize,
    /// Records written across all successful flushes.
    pub records_written: usize,
    /// Records refused by the buffer because their shape did not match.
    pub records_rejected: usize,
}
