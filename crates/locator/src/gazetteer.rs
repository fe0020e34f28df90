use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// A named settlement from the reference gazetteer.
///
/// `rank` follows the scale-rank convention: lower is more important.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    pub country: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

impl GazetteerEntry {
    pub fn new(name: impl Into<String>, country: impl Into<String>, lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            lat_deg,
            lon_deg,
            population: None,
            rank: None,
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Canonical location of the entry.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat_deg, self.lon_deg)
    }
}
