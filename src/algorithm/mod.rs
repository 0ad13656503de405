//! Algorithm implementations for regional aggregation
//!
//! This module contains the name normalization used for matching free-text
//! place names, the per-level region lookup index, and the aggregation pass
//! that partitions person records over a level.

pub mod aggregate;
pub mod index;
pub mod normalize;

pub use aggregate::{AssignmentReport, Aggregator};
pub use index::RegionIndex;
pub use normalize::normalize;
