//! Person record model
//!
//! A person record is the immutable input of the aggregation passes. The
//! engine shares records by `Arc` between region membership lists and never
//! mutates them.

use serde::{Deserialize, Serialize};

/// One person and the place they are located in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-text province name, e.g. `浙江省` or `浙江`
    #[serde(default)]
    pub province: String,
    /// Free-text city name, e.g. `杭州市`
    #[serde(default)]
    pub city: String,
    /// School or organisation
    #[serde(default)]
    pub school: String,
}

impl PersonRecord {
    /// Create a new record
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
        school: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            province: province.into(),
            city: city.into(),
            school: school.into(),
        }
    }
}
