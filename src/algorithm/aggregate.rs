//! Aggregation of person records over one hierarchy level
//!
//! Each pass walks the records in input order, resolves the chosen location
//! field through the level's `RegionIndex` and appends the record to the
//! matching region. Records that resolve to nothing are skipped and reported,
//! never raised as errors.

use std::sync::Arc;

use itertools::Itertools;

use crate::algorithm::index::RegionIndex;
use crate::models::{BoundaryPayload, LocationField, PersonRecord, Region, RegionLevel};

/// Outcome of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentReport {
    /// Number of records assigned to a region
    pub matched: usize,
    /// Records whose location resolved to no region, in input order
    pub unmatched: Vec<Arc<PersonRecord>>,
}

impl AssignmentReport {
    /// Number of records the pass looked at
    #[must_use]
    pub fn total(&self) -> usize {
        self.matched + self.unmatched.len()
    }

    /// Whether every record found a region
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Distinct unmatched place names for the given field, in first-seen order
    #[must_use]
    pub fn unmatched_names(&self, field: LocationField) -> Vec<&str> {
        self.unmatched
            .iter()
            .map(|record| field.value_of(record))
            .unique()
            .collect()
    }
}

/// Aggregation passes over region indexes
pub struct Aggregator;

impl Aggregator {
    /// Assign records to the regions of `index`
    ///
    /// Increments `value` and appends to `members` of every matched region.
    /// The index is expected to be freshly built; the pass does not reset
    /// earlier results.
    ///
    /// Afterwards `sum(region.value) + report.unmatched.len()` equals the
    /// number of records.
    pub fn assign(
        index: &mut RegionIndex,
        records: &[Arc<PersonRecord>],
        field: LocationField,
    ) -> AssignmentReport {
        let mut report = AssignmentReport::default();

        for record in records {
            let place = field.value_of(record);
            match index.position_of(place) {
                Some(position) => {
                    if let Some(region) = index.region_mut(position) {
                        region.add_member(Arc::clone(record));
                        report.matched += 1;
                    }
                }
                None => {
                    log::debug!(
                        "No {} region matches {place:?} for {}",
                        index.level(),
                        record.name
                    );
                    report.unmatched.push(Arc::clone(record));
                }
            }
        }

        if report.is_complete() {
            log::info!(
                "Assigned {} records to {} {} regions",
                report.matched,
                index.len(),
                index.level()
            );
        } else {
            log::warn!(
                "Assigned {} of {} records to {} regions; unmatched places: {}",
                report.matched,
                report.total(),
                index.level(),
                report.unmatched_names(field).join(", ")
            );
        }

        report
    }

    /// Re-partition a parent region's members over its child-level boundary data
    ///
    /// Builds a fresh child-level index from `payload` and assigns the
    /// parent's current members by `field`. The parent itself is not touched.
    #[must_use]
    pub fn partition(
        parent: &Region,
        payload: &BoundaryPayload,
        field: LocationField,
    ) -> (RegionIndex, AssignmentReport) {
        let level = parent.level.child().unwrap_or(RegionLevel::City);
        let mut index = RegionIndex::build(payload.regions(level, Some(&parent.id)));
        let report = Self::assign(&mut index, &parent.members, field);
        (index, report)
    }
}
