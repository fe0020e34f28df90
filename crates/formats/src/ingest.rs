//! Conversion from raw GeoJSON collections into locator reference data.
//!
//! Ingest never fails: features that cannot serve as a region or a
//! settlement are logged and dropped, the rest load normally.

use locator::{Feature, GazetteerEntry, PolygonGeometry};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::vector_collection::{LonLat, VectorCollection, VectorFeature, VectorGeometry};

const NAME_KEYS: &[&str] = &["name", "NAME", "NAMEASCII"];
const COUNTRY_KEYS: &[&str] = &["country", "adm0name", "ADMIN"];
const LATITUDE_KEYS: &[&str] = &["latitude"];
const LONGITUDE_KEYS: &[&str] = &["longitude"];
const POPULATION_KEYS: &[&str] = &["pop_max", "POP_MAX"];
const RANK_KEYS: &[&str] = &["scalerank", "SCALERANK"];

/// Polygon and MultiPolygon features as labeled regions, in input order.
pub fn region_features(collection: VectorCollection) -> Vec<Feature> {
    let total = collection.features.len();
    let mut out = Vec::with_capacity(total);

    for (index, feature) in collection.features.into_iter().enumerate() {
        let geometry = match &feature.geometry {
            VectorGeometry::Polygon(rings) => PolygonGeometry::polygon(&raw_rings(rings)),
            VectorGeometry::MultiPolygon(polys) => {
                let polys: Vec<Vec<Vec<[f64; 2]>>> =
                    polys.iter().map(|rings| raw_rings(rings)).collect();
                PolygonGeometry::multi_polygon(&polys)
            }
            other => {
                debug!(index, kind = other.type_name(), "non-areal feature skipped");
                continue;
            }
        };

        match geometry {
            Some(geometry) => out.push(Feature::new(feature.properties, geometry)),
            None => warn!(index, "region feature has no usable outer ring; skipped"),
        }
    }

    debug!(kept = out.len(), total, "region features ingested");
    out
}

fn raw_rings(rings: &[Vec<LonLat>]) -> Vec<Vec<[f64; 2]>> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|p| p.as_array()).collect())
        .collect()
}

/// Point features as gazetteer entries, in input order.
///
/// Property fallbacks: name `name|NAME|NAMEASCII`, country
/// `country|adm0name|ADMIN`, position `latitude`/`longitude` else the point
/// coordinates, population `pop_max|POP_MAX`, rank `scalerank|SCALERANK`.
/// Entries without a name or with an unusable position are dropped.
pub fn gazetteer_entries(collection: VectorCollection) -> Vec<GazetteerEntry> {
    let total = collection.features.len();
    let mut out = Vec::with_capacity(total);

    for (index, feature) in collection.features.iter().enumerate() {
        match gazetteer_entry(feature) {
            Ok(entry) => out.push(entry),
            Err(reason) => debug!(index, reason, "settlement skipped"),
        }
    }

    if out.len() < total {
        warn!(kept = out.len(), total, "some settlements were skipped");
    } else {
        debug!(kept = out.len(), total, "settlements ingested");
    }
    out
}

fn gazetteer_entry(feature: &VectorFeature) -> Result<GazetteerEntry, &'static str> {
    let VectorGeometry::Point(position) = &feature.geometry else {
        return Err("not a point");
    };
    let props = &feature.properties;

    let name = string_prop(props, NAME_KEYS).ok_or("missing name")?;
    let country = string_prop(props, COUNTRY_KEYS).unwrap_or_default();
    let lat_deg = number_prop(props, LATITUDE_KEYS).unwrap_or(position.lat_deg);
    let lon_deg = number_prop(props, LONGITUDE_KEYS).unwrap_or(position.lon_deg);

    if !lat_deg.is_finite() || !lon_deg.is_finite() {
        return Err("non-finite position");
    }
    if !(-90.0..=90.0).contains(&lat_deg) {
        return Err("latitude out of range");
    }

    let mut entry = GazetteerEntry::new(name, country, lat_deg, lon_deg);
    entry.population = number_prop(props, POPULATION_KEYS)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .map(|p| p.round() as u64);
    entry.rank = number_prop(props, RANK_KEYS)
        .filter(|r| r.is_finite())
        .map(|r| r.round() as i32);
    Ok(entry)
}

/// First key holding a non-blank string.
fn string_prop(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let text = props.get(*key)?.as_str()?.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

/// First key holding a number or a numeric string.
fn number_prop(props: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match props.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Gazetteer entries as a FeatureCollection of points, using the primary
/// property names so the output ingests back unchanged.
pub fn gazetteer_collection<'a, I>(entries: I) -> VectorCollection
where
    I: IntoIterator<Item = &'a GazetteerEntry>,
{
    let features = entries
        .into_iter()
        .map(|entry| {
            let mut properties = Map::new();
            properties.insert("name".to_string(), Value::from(entry.name.clone()));
            properties.insert("country".to_string(), Value::from(entry.country.clone()));
            if let Some(population) = entry.population {
                properties.insert("pop_max".to_string(), Value::from(population));
            }
            if let Some(rank) = entry.rank {
                properties.insert("scalerank".to_string(), Value::from(rank));
            }
            VectorFeature {
                id: None,
                properties,
                geometry: VectorGeometry::Point(LonLat::new(entry.lon_deg, entry.lat_deg)),
            }
        })
        .collect();

    VectorCollection { features }
}

#[cfg(test)]
mod tests {
    use super::{gazetteer_collection, gazetteer_entries, region_features};
    use crate::vector_collection::VectorCollection;
    use foundation::math::GeoPoint;
    use locator::{GazetteerEntry, LabelKeys, resolve};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn collection(features: serde_json::Value) -> VectorCollection {
        VectorCollection::from_geojson_value(json!({
            "type": "FeatureCollection",
            "features": features
        }))
        .unwrap()
    }

    #[test]
    fn regions_from_polygons_and_multipolygons() {
        let c = collection(json!([
            {
                "type": "Feature",
                "properties": { "ADMIN": "Squareland" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]] }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Point" },
                "geometry": { "type": "Point", "coordinates": [5, 5] }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Degenerate" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 1]]] }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [21, 0], [21, 1], [20, 1]]],
                        [[[30, 0], [31, 0], [31, 1], [30, 1]]]
                    ]
                }
            }
        ]));

        let regions = region_features(c);
        assert_eq!(regions.len(), 2);

        let keys = LabelKeys::countries();
        assert_eq!(resolve(GeoPoint::new(5.0, 5.0), &regions, &keys), "Squareland");
        assert_eq!(resolve(GeoPoint::new(0.5, 30.5), &regions, &keys), "Islands");
    }

    #[test]
    fn gazetteer_property_fallbacks() {
        let c = collection(json!([
            {
                "type": "Feature",
                "properties": { "NAME": "Upper", "ADMIN": "Country A", "POP_MAX": 1500000, "SCALERANK": 2 },
                "geometry": { "type": "Point", "coordinates": [9.0, 45.0] }
            },
            {
                "type": "Feature",
                "properties": { "NAMEASCII": "Ascii", "adm0name": "Country B", "latitude": "10.5", "longitude": "-20.25", "pop_max": "1200" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            },
            {
                "type": "Feature",
                "properties": { "country": "Nowhere" },
                "geometry": { "type": "Point", "coordinates": [1, 1] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Line" },
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Bad lat", "latitude": 95 },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }
        ]));

        let entries = gazetteer_entries(c);
        assert_eq!(
            entries,
            vec![
                GazetteerEntry::new("Upper", "Country A", 45.0, 9.0)
                    .with_population(1_500_000)
                    .with_rank(2),
                GazetteerEntry::new("Ascii", "Country B", 10.5, -20.25).with_population(1200),
            ]
        );
    }

    #[test]
    fn exported_gazetteer_ingests_back() {
        let entries = vec![
            GazetteerEntry::new("Milan", "Italy", 45.46, 9.19).with_rank(2),
            GazetteerEntry::new("Suva", "Fiji", -18.14, 178.44).with_population(93_000),
        ];
        let exported = gazetteer_collection(&entries);
        let text = exported.to_geojson_string().unwrap();
        let reparsed = VectorCollection::from_geojson_str(&text).unwrap();
        assert_eq!(gazetteer_entries(reparsed), entries);
    }
}
