//! Name lookup index for one hierarchy level
//!
//! The index owns the regions of a single level and maps every name a region
//! can be found under to its position. Building the index is also what
//! re-initializes the level: every region starts the new aggregation pass
//! with `value == 0` and no members.

use rustc_hash::FxHashMap;

use crate::algorithm::normalize::normalize;
use crate::models::{Region, RegionLevel};

/// Lookup table from raw and normalized names to the regions of one level
#[derive(Debug, Clone)]
pub struct RegionIndex {
    level: RegionLevel,
    regions: Vec<Region>,
    by_name: FxHashMap<String, usize>,
}

impl RegionIndex {
    /// Build an index over the regions of one level
    ///
    /// Each region is registered under its display name, each alias, and the
    /// normalized form of each of those. When two regions share a key the
    /// region processed last wins; the earlier one stays reachable through
    /// its other keys only.
    ///
    /// The level of the index is taken from the first region; an empty index
    /// is a province-level index.
    #[must_use]
    pub fn build(mut regions: Vec<Region>) -> Self {
        let level = regions
            .first()
            .map_or(RegionLevel::Province, |region| region.level);

        let mut by_name = FxHashMap::default();
        by_name.reserve(regions.len() * 4);

        for (position, region) in regions.iter_mut().enumerate() {
            region.reset();

            for name in std::iter::once(&region.name).chain(region.aliases.iter()) {
                by_name.insert(name.clone(), position);
                by_name.insert(normalize(name), position);
            }
        }

        // A blank name is never a lookup key
        by_name.remove("");

        Self {
            level,
            regions,
            by_name,
        }
    }

    /// Hierarchy level of the indexed regions
    #[must_use]
    pub const fn level(&self) -> RegionLevel {
        self.level
    }

    /// Resolve a free-text place name
    ///
    /// Tries the raw name first, then its normalized form.
    #[must_use]
    pub fn resolve(&self, raw_name: &str) -> Option<&Region> {
        self.position_of(raw_name).map(|position| &self.regions[position])
    }

    /// Position of the region a free-text place name resolves to
    #[must_use]
    pub fn position_of(&self, raw_name: &str) -> Option<usize> {
        self.by_name
            .get(raw_name)
            .or_else(|| self.by_name.get(normalize(raw_name).as_str()))
            .copied()
    }

    /// Find a region by its code
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    /// Regions in build order
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub(crate) fn region_mut(&mut self, position: usize) -> Option<&mut Region> {
        self.regions.get_mut(position)
    }

    /// Give the regions back, keeping their aggregation results
    #[must_use]
    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    /// Number of indexed regions
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the index holds no regions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of distinct lookup keys
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.by_name.len()
    }
}
