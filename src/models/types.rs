//! Common domain type definitions
//!
//! Small enums shared by the region models and the aggregation code.

use std::fmt;

use crate::models::person::PersonRecord;

/// Hierarchy level of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLevel {
    /// The whole country
    Country,
    /// Province, autonomous region, municipality or SAR
    Province,
    /// Prefecture-level city or equivalent
    City,
}

impl RegionLevel {
    /// Level one step below this one, if any
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::Country => Some(Self::Province),
            Self::Province => Some(Self::City),
            Self::City => None,
        }
    }
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Country => "country",
            Self::Province => "province",
            Self::City => "city",
        };
        f.write_str(name)
    }
}

/// Which location field of a person record is matched against a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Province,
    City,
}

impl LocationField {
    /// Raw place name of `record` for this field
    #[must_use]
    pub fn value_of(self, record: &PersonRecord) -> &str {
        match self {
            Self::Province => &record.province,
            Self::City => &record.city,
        }
    }
}
