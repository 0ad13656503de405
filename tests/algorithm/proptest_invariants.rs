//! Property-based invariant tests for name normalization and aggregation
//!
//! 1. `normalize` is idempotent for any string.
//! 2. Every record is either counted in exactly one region or reported as
//!    unmatched, at province and at city level.
//! 3. A region's count always equals the length of its member list.

use std::sync::Arc;

use classmap::{
    Aggregator, LocationField, PersonRecord, RegionIndex, RegionLevel, normalize,
};
use proptest::prelude::*;

use crate::utils::{ROOT, ZHEJIANG, country_payload, person, zhejiang_payload};

// ── Strategies ──────────────────────────────────────────────────────────

/// Names assembled from stems, suffixes and whitespace, so suffix stripping
/// is exercised far more often than with arbitrary strings
fn place_name_strategy() -> impl Strategy<Value = String> {
    let parts = prop::sample::select(vec![
        "浙", "江", "杭州", "北京", "台湾", "赵", "和", "省", "市", "县", "区", "自治", "自治区",
        "自治县", "市辖区", "特别行政区", "维吾尔自治区", "盟", " ", "\t", "a",
    ]);
    prop::collection::vec(parts, 0..8).prop_map(|parts| parts.concat())
}

fn province_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["浙江省", "浙江", " 浙江 ", "北京市", "北京", "台湾", "台湾省", ""])
            .prop_map(str::to_string),
        place_name_strategy(),
        any::<String>(),
    ]
}

fn city_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["杭州市", "杭州", "宁波", "宁波市", "温州市", "舟山市", ""])
            .prop_map(str::to_string),
        place_name_strategy(),
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<Arc<PersonRecord>>> {
    prop::collection::vec((province_strategy(), city_strategy()), 0..64).prop_map(|places| {
        places
            .into_iter()
            .enumerate()
            .map(|(i, (province, city))| person(&format!("p{i}"), &province, &city))
            .collect()
    })
}

fn assert_counts_match_members(index: &RegionIndex) -> Result<(), TestCaseError> {
    for region in index.regions() {
        prop_assert_eq!(region.value as usize, region.members.len(), "{}", region.name);
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Normalization is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalize_idempotent_on_place_names(name in place_name_strategy()) {
        let once = normalize(&name);
        prop_assert_eq!(normalize(&once), once, "input {:?}", name);
    }

    #[test]
    fn normalize_idempotent_on_any_string(name in any::<String>()) {
        let once = normalize(&name);
        prop_assert_eq!(normalize(&once), once, "input {:?}", name);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. and 3. Aggregation conserves records
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn province_assignment_conserves_records(records in records_strategy()) {
        let payload = country_payload();
        let mut index = RegionIndex::build(payload.regions(RegionLevel::Province, Some(ROOT)));
        let report = Aggregator::assign(&mut index, &records, LocationField::Province);

        let assigned: usize = index.regions().iter().map(|r| r.value as usize).sum();
        prop_assert_eq!(assigned + report.unmatched.len(), records.len());
        prop_assert_eq!(report.matched, assigned);
        assert_counts_match_members(&index)?;
    }

    #[test]
    fn city_partition_conserves_members(records in records_strategy()) {
        let payload = country_payload();
        let mut provinces = RegionIndex::build(payload.regions(RegionLevel::Province, Some(ROOT)));
        Aggregator::assign(&mut provinces, &records, LocationField::Province);
        let zhejiang = provinces.get(ZHEJIANG).unwrap();

        let (cities, report) =
            Aggregator::partition(zhejiang, &zhejiang_payload(), LocationField::City);

        let assigned: usize = cities.regions().iter().map(|r| r.value as usize).sum();
        prop_assert_eq!(assigned + report.unmatched.len(), zhejiang.members.len());
        assert_counts_match_members(&cities)?;
    }
}
