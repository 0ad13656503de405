//! Asynchronous boundary data loading
//!
//! Sources that fetch boundary documents, the coalescing cache in front of
//! them, and the downloader that maintains a local mirror.

pub mod loader;
pub mod sync;
pub mod topology_cache;

pub use loader::{DirectoryBoundarySource, HttpBoundarySource, source_from_config, topo_file_name};
pub use sync::{MapSync, SyncReport, collect_province_codes, default_mirror_dir};
pub use topology_cache::{BoundaryResult, PendingBoundary, TopologyCache, canonical_code};
