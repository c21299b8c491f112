//! Configuration and constants.
//!
//! This module provides:
//! - Configuration constants (batch defaults, SQLite limits, env var names)
//! - Batch configuration and logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{BatchConfig, LogFormat, LogLevel};
