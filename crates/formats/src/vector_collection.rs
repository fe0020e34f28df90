use serde_json::{Map, Value};

use crate::error::FormatError;

/// A raw GeoJSON position. Coordinates are kept exactly as authored; no
/// canonicalization happens at this layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VectorGeometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl VectorGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            VectorGeometry::Point(_) => "Point",
            VectorGeometry::MultiPoint(_) => "MultiPoint",
            VectorGeometry::LineString(_) => "LineString",
            VectorGeometry::MultiLineString(_) => "MultiLineString",
            VectorGeometry::Polygon(_) => "Polygon",
            VectorGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: VectorGeometry,
}

/// Features that could not be read from an otherwise valid collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorCollection {
    pub features: Vec<VectorFeature>,
}

impl VectorCollection {
    /// Strict parse: the first unreadable feature fails the whole document.
    pub fn from_geojson_str(payload: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, FormatError> {
        let features = feature_values(&value)?;
        let mut out = Vec::with_capacity(features.len());
        for (index, feat_val) in features.iter().enumerate() {
            let feature = parse_feature(feat_val)
                .map_err(|reason| FormatError::InvalidFeature { index, reason })?;
            out.push(feature);
        }
        Ok(Self { features: out })
    }

    /// Lenient parse for reference data: structural document errors still
    /// fail, unreadable features are returned alongside the rest.
    pub fn from_geojson_value_lossy(
        value: Value,
    ) -> Result<(Self, Vec<SkippedFeature>), FormatError> {
        let features = feature_values(&value)?;
        let mut out = Vec::with_capacity(features.len());
        let mut skipped = Vec::new();
        for (index, feat_val) in features.iter().enumerate() {
            match parse_feature(feat_val) {
                Ok(feature) => out.push(feature),
                Err(reason) => skipped.push(SkippedFeature { index, reason }),
            }
        }
        Ok((Self { features: out }, skipped))
    }

    /// Semantic round-trip exporter: emits a GeoJSON FeatureCollection.
    /// (Property ordering may differ from the original input.)
    pub fn to_geojson_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );

        let mut features: Vec<Value> = Vec::with_capacity(self.features.len());
        for feat in &self.features {
            let mut fobj = Map::new();
            fobj.insert("type".to_string(), Value::String("Feature".to_string()));
            if let Some(id) = &feat.id {
                fobj.insert("id".to_string(), Value::String(id.clone()));
            }
            fobj.insert(
                "properties".to_string(),
                Value::Object(feat.properties.clone()),
            );
            fobj.insert(
                "geometry".to_string(),
                geometry_to_geojson_value(&feat.geometry),
            );
            features.push(Value::Object(fobj));
        }

        root.insert("features".to_string(), Value::Array(features));
        Value::Object(root)
    }

    pub fn to_geojson_string(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string(&self.to_geojson_value())?)
    }

    pub fn to_geojson_string_pretty(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&self.to_geojson_value())?)
    }
}

fn feature_values(value: &Value) -> Result<&Vec<Value>, FormatError> {
    let obj = value.as_object().ok_or(FormatError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(FormatError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(FormatError::NotAFeatureCollection);
    }
    obj.get("features")
        .and_then(|v| v.as_array())
        .ok_or(FormatError::NotAFeatureCollection)
}

fn parse_feature(value: &Value) -> Result<VectorFeature, String> {
    let feat_obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry_val = match feat_obj.get("geometry") {
        None | Some(Value::Null) => return Err("feature has no geometry".to_string()),
        Some(v) => v,
    };
    let geometry = parse_geometry(geometry_val)?;

    Ok(VectorFeature {
        id,
        properties,
        geometry,
    })
}

fn geometry_to_geojson_value(geom: &VectorGeometry) -> Value {
    let coordinates = match geom {
        VectorGeometry::Point(p) => point_coords(p),
        VectorGeometry::MultiPoint(ps) | VectorGeometry::LineString(ps) => line_coords(ps),
        VectorGeometry::MultiLineString(lines) | VectorGeometry::Polygon(lines) => {
            Value::Array(lines.iter().map(|line| line_coords(line)).collect())
        }
        VectorGeometry::MultiPolygon(polys) => Value::Array(
            polys
                .iter()
                .map(|poly| Value::Array(poly.iter().map(|ring| line_coords(ring)).collect()))
                .collect(),
        ),
    };

    let mut obj = Map::new();
    obj.insert(
        "type".to_string(),
        Value::String(geom.type_name().to_string()),
    );
    obj.insert("coordinates".to_string(), coordinates);
    Value::Object(obj)
}

fn point_coords(p: &LonLat) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn line_coords(ps: &[LonLat]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}

fn parse_geometry(value: &Value) -> Result<VectorGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(VectorGeometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(VectorGeometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(VectorGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(VectorGeometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(VectorGeometry::Polygon(parse_lines(coords)?)),
        "MultiPolygon" => Ok(VectorGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<LonLat>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_lines).collect()
}
