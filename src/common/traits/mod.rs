//! Common traits used across the codebase
//!
//! This module defines the traits placed at the seams between the engine and
//! its collaborators.

pub mod async_loading;
pub mod view;

pub use async_loading::{BoundaryFuture, BoundarySource};
pub use view::{LoggingView, MapView};
