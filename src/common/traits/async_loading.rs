//! Async boundary loading trait
//!
//! Boundary documents can come from a remote API, a local mirror or, in
//! tests, from memory. The topology cache only needs one operation from any
//! of them: fetch the document for a region code.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;
use crate::models::BoundaryPayload;

/// Future returned by [`BoundarySource::fetch`]
pub type BoundaryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoundaryPayload, FetchError>> + Send + 'a>>;

/// Core trait for asynchronous boundary data loading
pub trait BoundarySource: Send + Sync {
    /// Fetch and parse the boundary document for a canonical region code
    ///
    /// Every failure, including a document that cannot be parsed, is
    /// reported as a `FetchError` for that code.
    fn fetch<'a>(&'a self, code: &'a str) -> BoundaryFuture<'a>;

    /// Human-readable location of the data, for logging
    fn location(&self) -> String;
}
