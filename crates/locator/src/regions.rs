use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::containment::contains;
use crate::geometry::PolygonGeometry;

/// Sentinel label for anything that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// A labeled region boundary (continent, country, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub properties: Map<String, Value>,
    pub geometry: PolygonGeometry,
}

impl Feature {
    pub fn new(properties: Map<String, Value>, geometry: PolygonGeometry) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    /// Convenience for a feature with a single string property.
    pub fn named(key: &str, value: &str, geometry: PolygonGeometry) -> Self {
        let mut properties = Map::new();
        properties.insert(key.to_string(), Value::String(value.to_string()));
        Self::new(properties, geometry)
    }
}

/// Ordered candidate property keys used to label a feature.
///
/// The first key holding a non-empty string wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelKeys(pub Vec<String>);

impl LabelKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn continents() -> Self {
        Self::new(["CONTINENT", "continent", "name"])
    }

    pub fn countries() -> Self {
        Self::new(["ADMIN", "NAME_EN", "NAME", "name"])
    }

    pub fn label<'a>(&self, properties: &'a Map<String, Value>) -> Option<&'a str> {
        self.0.iter().find_map(|key| {
            let text = properties.get(key)?.as_str()?.trim();
            (!text.is_empty()).then_some(text)
        })
    }
}

/// First feature (in input order) whose geometry contains `point`.
pub fn find_containing(point: GeoPoint, features: &[Feature]) -> Option<&Feature> {
    features.iter().find(|f| contains(point, &f.geometry))
}

/// Label of the first containing feature, or [`UNKNOWN`].
///
/// A containing feature without a usable label still ends the scan: the
/// result is then [`UNKNOWN`], later features are not consulted.
pub fn resolve<'a>(point: GeoPoint, features: &'a [Feature], keys: &LabelKeys) -> &'a str {
    find_containing(point, features)
        .and_then(|f| keys.label(&f.properties))
        .unwrap_or(UNKNOWN)
}
