//! Memoizing, coalescing cache of boundary payloads
//!
//! The first `load` for a region code installs a shared pending fetch in the
//! cache before anything is awaited. Every later `load` for the same code,
//! whether issued while that fetch is in flight or long after it resolved,
//! gets a clone of the same shared future, so each code reaches the
//! boundary source at most once.
//!
//! Successful payloads stay cached for the lifetime of the cache. What
//! happens to failures depends on the configured [`FailurePolicy`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use rustc_hash::FxHashMap;

use crate::common::traits::BoundarySource;
use crate::config::FailurePolicy;
use crate::error::FetchError;
use crate::models::BoundaryPayload;

/// Settled outcome of a boundary fetch
pub type BoundaryResult = Result<Arc<BoundaryPayload>, FetchError>;

/// Shared handle on a pending or settled boundary fetch
///
/// Clones of one handle compare equal with [`Shared::ptr_eq`].
pub type PendingBoundary = Shared<BoxFuture<'static, BoundaryResult>>;

type Entries = Arc<Mutex<FxHashMap<String, PendingBoundary>>>;

/// Canonical cache key of a region code
///
/// Surrounding whitespace and a trailing `.topo.json`, `.geo.json` or
/// `.json` extension are removed, so `330000` and `330000.topo.json` share
/// one entry.
#[must_use]
pub fn canonical_code(code: &str) -> &str {
    let code = code.trim();
    [".topo.json", ".geo.json", ".json"]
        .iter()
        .find_map(|extension| code.strip_suffix(extension))
        .unwrap_or(code)
}

/// Cache of boundary payloads keyed by canonical region code
#[derive(Clone)]
pub struct TopologyCache {
    source: Arc<dyn BoundarySource>,
    entries: Entries,
    policy: FailurePolicy,
}

impl TopologyCache {
    /// Create an empty cache in front of `source`
    #[must_use]
    pub fn new(source: Arc<dyn BoundarySource>, policy: FailurePolicy) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(FxHashMap::default())),
            policy,
        }
    }

    /// Failure caching policy in effect
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Load the boundary payload for a region code
    ///
    /// Returns the shared handle for the canonical code, installing it first
    /// when no entry exists. The fetch runs when the handle is first polled.
    pub fn load(&self, code: &str) -> PendingBoundary {
        let key = canonical_code(code).to_string();
        let mut entries = lock(&self.entries);

        if let Some(pending) = entries.get(&key) {
            log::debug!("Boundary data for {key} served from cache");
            return pending.clone();
        }

        log::debug!("Boundary data for {key} not cached, fetching from {}", self.source.location());
        let pending = self.fetch(key.clone());
        entries.insert(key, pending.clone());
        pending
    }

    fn fetch(&self, key: String) -> PendingBoundary {
        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);
        let policy = self.policy;

        async move {
            match source.fetch(&key).await {
                Ok(payload) => Ok(Arc::new(payload)),
                Err(error) => {
                    if policy == FailurePolicy::RetryOnFailure {
                        log::warn!("{error}; evicting so the next load retries");
                        // Evicted before any waiter sees the failure, so the
                        // next load starts a fresh request
                        lock(&entries).remove(&key);
                    } else {
                        log::warn!("{error}; failure cached");
                    }
                    Err(error)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Resolved payload for a region code, if its fetch already succeeded
    #[must_use]
    pub fn resolved(&self, code: &str) -> Option<Arc<BoundaryPayload>> {
        lock(&self.entries)
            .get(canonical_code(code))
            .and_then(Shared::peek)
            .and_then(|result| result.as_ref().ok().cloned())
    }

    /// Whether an entry, pending or settled, exists for a region code
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        lock(&self.entries).contains_key(canonical_code(code))
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl std::fmt::Debug for TopologyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopologyCache")
            .field("source", &self.source.location())
            .field("entries", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// The map is only ever touched synchronously, so a poisoned lock still
/// holds consistent data
fn lock(entries: &Entries) -> MutexGuard<'_, FxHashMap<String, PendingBoundary>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
