//! Domain models for the regional aggregation engine
//!
//! This module contains the person records supplied by the data loader,
//! the region entities built from boundary documents, and the parsed
//! boundary payloads themselves.

pub mod boundary;
pub mod person;
pub mod region;
pub mod types;

// Re-export commonly used types
pub use boundary::{BoundaryFeature, BoundaryPayload};
pub use person::PersonRecord;
pub use region::Region;
pub use types::{LocationField, RegionLevel};
