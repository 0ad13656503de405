//! Error handling for the aggregation and drill-down engine.

pub mod util;

use std::fmt;

use thiserror::Error;

use crate::drilldown::DrilldownState;

/// Failure to obtain boundary data for one region code
///
/// Cloneable so that every waiter on a coalesced fetch observes the same
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// Canonical region code the fetch was issued for
    pub code: String,
    /// HTTP status, when the remote resource answered at all
    pub status: Option<u16>,
    /// Status text or transport error message
    pub message: String,
}

impl FetchError {
    /// Failure reported by the remote resource with a non-success status
    #[must_use]
    pub fn status(code: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before any status was received (connection, decoding, disk)
    #[must_use]
    pub fn transport(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "failed to fetch boundary data for {}: HTTP {status} {}",
                self.code, self.message
            ),
            None => write!(
                f,
                "failed to fetch boundary data for {}: {}",
                self.code, self.message
            ),
        }
    }
}

impl std::error::Error for FetchError {}

/// Specialized error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    /// Boundary data for a drill target could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The country-level boundary data is unavailable, nothing can be built
    #[error("root boundary data {code} unavailable: {reason}")]
    MissingRootData { code: String, reason: String },

    /// No region with this id exists at the displayed level
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// The region has no child-level boundary data to drill into
    #[error("region {0} cannot be drilled into")]
    NotDrillable(String),

    /// The event is not valid in the current drill-down state
    #[error("cannot {event} while {state}")]
    InvalidTransition {
        event: &'static str,
        state: DrilldownState,
    },

    /// A boundary document could not be interpreted
    #[error("invalid boundary document: {0}")]
    InvalidBoundary(String),

    /// The person record list could not be loaded
    #[error("invalid person records: {0}")]
    InvalidRecords(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
