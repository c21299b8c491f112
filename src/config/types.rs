//! Configuration types.
//!
//! This module defines the batch configuration and the logging options.

use std::time::Duration;

use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::config::constants::{
    BATCH_SIZE_ENV, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL_SECS, FLUSH_INTERVAL_ENV,
};
use crate::error_handling::BatchSaveError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration for batch writing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of distinct records to stage before flushing
    pub batch_size: usize,
    /// Interval between timed flushes of the background writer (in seconds)
    pub flush_interval_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
        }
    }
}

impl BatchConfig {
    /// Builds a configuration from `BATCH_SAVE_BATCH_SIZE` and
    /// `BATCH_SAVE_FLUSH_INTERVAL_SECS`, falling back to the defaults for
    /// unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = BatchConfig::default();
        BatchConfig {
            batch_size: env_or(BATCH_SIZE_ENV, defaults.batch_size),
            flush_interval_secs: env_or(FLUSH_INTERVAL_ENV, defaults.flush_interval_secs),
        }
    }

    /// Rejects a zero batch size or a zero flush interval.
    pub fn validate(&self) -> Result<(), BatchSaveError> {
        if self.batch_size == 0 {
            return Err(BatchSaveError::InvalidCapacity);
        }
        if self.flush_interval_secs == 0 {
            return Err(BatchSaveError::InvalidConfig(
                "flush interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}
