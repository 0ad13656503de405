//! Region name normalization
//!
//! Free-text place names and boundary data disagree on whether the
//! administrative-unit suffix is part of the name (`浙江省` vs `浙江`,
//! `杭州市` vs `杭州`). Normalization strips that suffix so both sides meet
//! on the bare name.

/// Administrative-unit suffixes in priority order
///
/// Longer, more specific suffixes come first so that `自治县` wins over `县`.
pub const ADMINISTRATIVE_SUFFIXES: &[&str] = &[
    "特别行政区",
    "维吾尔自治区",
    "壮族自治区",
    "回族自治区",
    "自治区",
    "自治州",
    "自治县",
    "自治旗",
    "市辖区",
    "新区",
    "矿区",
    "林区",
    "地区",
    "盟",
    "省",
    "县",
    "区",
    "市",
];

/// Minimum number of characters a name keeps after stripping
const MIN_STEM_CHARS: usize = 2;

/// Canonicalize a region name for lookup
///
/// Trims surrounding whitespace, then repeatedly strips the first suffix of
/// [`ADMINISTRATIVE_SUFFIXES`] (in priority order) that leaves at least two
/// characters. Stopping at a fixed point keeps the function idempotent, and
/// the stem limit keeps short names such as `沙市` intact.
///
/// # Examples
/// ```
/// use classmap::algorithm::normalize;
///
/// assert_eq!(normalize("浙江省"), "浙江");
/// assert_eq!(normalize(" 新疆维吾尔自治区 "), "新疆");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut current = name.trim();

    while let Some(stem) = strip_first_suffix(current) {
        current = stem;
    }

    current.to_string()
}

/// Strip the highest-priority suffix that leaves a long enough stem
fn strip_first_suffix(name: &str) -> Option<&str> {
    ADMINISTRATIVE_SUFFIXES.iter().find_map(|suffix| {
        let stem = name.strip_suffix(suffix)?.trim_end();
        (stem.chars().count() >= MIN_STEM_CHARS).then_some(stem)
    })
}
