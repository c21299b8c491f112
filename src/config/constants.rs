//! Configuration constants.
//!
//! This module defines the defaults and limits used by the buffer and the
//! SQLite storage layer.

/// Default number of distinct records staged before an automatic flush
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Default interval between timed flushes of the background writer, in seconds
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 5;
pub const DB_PATH: &str = "./batch_save.db";

/// Environment variable overriding [`DB_PATH`]
pub const DB_PATH_ENV: &str = "BATCH_SAVE_DB_PATH";
/// Environment variable overriding [`DEFAULT_BATCH_SIZE`]
pub const BATCH_SIZE_ENV: &str = "BATCH_SAVE_BATCH_SIZE";
/// Environment variable overriding [`DEFAULT_FLUSH_INTERVAL_SECS`]
pub const FLUSH_INTERVAL_ENV: &str = "BATCH_SAVE_FLUSH_INTERVAL_SECS";
/// Environment variable selecting the log level (`error` .. `trace`)
pub const LOG_LEVEL_ENV: &str = "BATCH_SAVE_LOG_LEVEL";
/// Environment variable selecting the log format (`plain` or `json`)
pub const LOG_FORMAT_ENV: &str = "BATCH_SAVE_LOG_FORMAT";

/// Maximum number of bound parameters in one SQLite statement.
///
/// SQLite 3.32.0 raised `SQLITE_MAX_VARIABLE_NUMBER` from 999 to 32766.
/// Multi-row inserts are split into chunks that stay under this limit.
pub const SQLITE_MAX_VARIABLES: usize = 32766;

/// Separator between length-prefixed components of an identity key
pub const IDENTITY_SEPARATOR: char = ':';
