//! Shared utilities
//!
//! Logging helpers and progress reporting used by the loaders and the map
//! synchronisation.

pub mod logging;

pub use logging::{log_operation_complete, log_operation_start, log_warning};
