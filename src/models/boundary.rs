//! Boundary payload model
//!
//! Boundary documents arrive either as TopoJSON `Topology` documents (the
//! format served per region code) or as GeoJSON `FeatureCollection`s. Only
//! the feature properties matter to the engine; the raw document is kept
//! untouched for the rendering side.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::region::Region;
use crate::models::types::RegionLevel;

/// Properties of one drawable feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryFeature {
    /// Region code
    pub code: String,
    /// Display name
    pub name: String,
    /// Full official name, when it differs from the display name
    pub full_name: Option<String>,
    /// Key of the child-level document
    pub child_key: Option<String>,
}

/// A parsed boundary document for one region code
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPayload {
    /// Region code the document describes
    pub code: String,
    /// Features in document order
    pub features: Vec<BoundaryFeature>,
    /// The untouched document
    pub document: Value,
}

impl BoundaryPayload {
    /// Parse a boundary document
    ///
    /// # Errors
    /// Returns `Error::InvalidBoundary` when the document is neither a
    /// `Topology` nor a `FeatureCollection`.
    pub fn from_document(code: impl Into<String>, document: Value) -> Result<Self> {
        let code = code.into();
        let properties = match document.get("type").and_then(Value::as_str) {
            Some("Topology") => topology_properties(&document),
            Some("FeatureCollection") => collection_properties(&document),
            Some(other) => {
                return Err(Error::InvalidBoundary(format!(
                    "{code}: unsupported document type {other}"
                )));
            }
            None => {
                return Err(Error::InvalidBoundary(format!(
                    "{code}: document has no type"
                )));
            }
        };

        let features = properties
            .into_iter()
            .filter_map(|props| {
                let feature = parse_feature(props);
                if feature.is_none() {
                    log::warn!("Skipping unnamed feature in boundary document {code}");
                }
                feature
            })
            .collect();

        Ok(Self {
            code,
            features,
            document,
        })
    }

    /// Parse a boundary document from raw bytes
    pub fn from_slice(code: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes)?;
        Self::from_document(code, document)
    }

    /// Number of named features
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the document contains no named features
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Create fresh regions for every feature
    ///
    /// Child-load keys are only carried by province-level regions; drill
    /// depth stops at cities.
    #[must_use]
    pub fn regions(&self, level: RegionLevel, parent_id: Option<&str>) -> Vec<Region> {
        self.features
            .iter()
            .map(|feature| {
                let mut region = Region::new(&feature.code, &feature.name, level);
                if let Some(full_name) = &feature.full_name {
                    region = region.with_alias(full_name);
                }
                if let Some(parent_id) = parent_id {
                    region = region.with_parent(parent_id);
                }
                if level == RegionLevel::Province {
                    if let Some(key) = &feature.child_key {
                        region = region.with_child_load_key(key);
                    }
                }
                region
            })
            .collect()
    }
}

fn topology_properties(document: &Value) -> Vec<&Map<String, Value>> {
    let Some(objects) = document.get("objects").and_then(Value::as_object) else {
        return Vec::new();
    };

    objects
        .values()
        .flat_map(|object| match object.get("geometries").and_then(Value::as_array) {
            Some(geometries) => geometries.iter().collect::<Vec<_>>(),
            None => vec![object],
        })
        .filter_map(|geometry| geometry.get("properties").and_then(Value::as_object))
        .collect()
}

fn collection_properties(document: &Value) -> Vec<&Map<String, Value>> {
    document
        .get("features")
        .and_then(Value::as_array)
        .map(|features| {
            features
                .iter()
                .filter_map(|feature| feature.get("properties").and_then(Value::as_object))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_feature(props: &Map<String, Value>) -> Option<BoundaryFeature> {
    let name = text_property(props, &["name"])?;
    let code = text_property(props, &["adcode", "code", "filename"]).unwrap_or_else(|| name.clone());
    let full_name = text_property(props, &["fullname"]).filter(|full| *full != name);

    let children = props
        .get("childrenNum")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let child_key = text_property(props, &["filename"])
        .or_else(|| (children > 0).then(|| code.clone()));

    Some(BoundaryFeature {
        code,
        name,
        full_name,
        child_key,
    })
}

/// First non-empty string or number property among `keys`
fn text_property(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match props.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
