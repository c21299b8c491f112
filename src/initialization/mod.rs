//! Application initialization.
//!
//! This module provides logger setup. Database pools are created through
//! [`crate::storage::init_db_pool_with_path`].

mod logger;

// Re-export public API
pub use logger::{init_logger_from_env, init_logger_with};
