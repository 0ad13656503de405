//! Regional aggregation and drill-down engine.
//!
//! Attaches per-person location records to a country → province → city
//! hierarchy, counts them per region and drives a two-level drill-down with
//! lazily fetched, cached boundary data.

pub mod algorithm;
pub mod async_io;
pub mod common;
pub mod config;
pub mod drilldown;
pub mod error;
pub mod loader;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{FailurePolicy, MapConfig};
pub use error::{Error, FetchError, Result};
pub use models::{BoundaryPayload, LocationField, PersonRecord, Region, RegionLevel};

// Aggregation
pub use algorithm::{Aggregator, AssignmentReport, RegionIndex, normalize};

// Boundary loading
pub use async_io::{
    DirectoryBoundarySource, HttpBoundarySource, MapSync, PendingBoundary, SyncReport,
    TopologyCache,
};
pub use common::traits::{BoundarySource, LoggingView, MapView};

// Navigation
pub use drilldown::{
    DrilldownController, DrilldownEvent, DrilldownSession, DrilldownState, Intent,
    InteractionMode, LevelView, ModalContent, PointerCapabilities, Transition,
};

// Record loading
pub use loader::{load_records, load_records_from, parse_records};
