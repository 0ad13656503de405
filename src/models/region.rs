//! Region entity model
//!
//! A region is created when the boundary data for its level is parsed. Its
//! `value` and `members` belong to the aggregation pass of that level and are
//! reset whenever a `RegionIndex` is built over it.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::models::person::PersonRecord;
use crate::models::types::RegionLevel;

/// A named geographic entity at one hierarchy level
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Region code, e.g. `330000`
    pub id: String,
    /// Display name as found in the boundary data
    pub name: String,
    /// Alternate names, usually the full official name
    pub aliases: SmallVec<[String; 2]>,
    /// Hierarchy level
    pub level: RegionLevel,
    /// Code of the enclosing region
    pub parent_id: Option<String>,
    /// Key of the child-level boundary document, when a drill-down exists
    pub child_load_key: Option<String>,
    /// Number of members
    pub value: u32,
    /// Members in input order
    pub members: Vec<Arc<PersonRecord>>,
}

impl Region {
    /// Create a region with no aliases, no children and no members
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: RegionLevel) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: SmallVec::new(),
            level,
            parent_id: None,
            child_load_key: None,
            value: 0,
            members: Vec::new(),
        }
    }

    /// Add an alternate name
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !alias.is_empty() && alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Set the enclosing region
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the child-level boundary key
    #[must_use]
    pub fn with_child_load_key(mut self, key: impl Into<String>) -> Self {
        self.child_load_key = Some(key.into());
        self
    }

    /// Whether a drill-down into this region is possible
    #[must_use]
    pub const fn is_drillable(&self) -> bool {
        self.child_load_key.is_some()
    }

    /// Clear the aggregation results
    pub fn reset(&mut self) {
        self.value = 0;
        self.members.clear();
    }

    /// Record one member
    pub fn add_member(&mut self, record: Arc<PersonRecord>) {
        self.value += 1;
        self.members.push(record);
    }
}
