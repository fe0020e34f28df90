/// Axis-aligned bounds in plain (lon, lat) degrees.
///
/// Longitudes are not wrapped: bounds of an unwrapped ring may extend past
/// ±180.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl LonLatBounds {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        LonLatBounds { min, max }
    }

    /// Bounds of a set of `[lon, lat]` pairs; `None` when empty.
    pub fn from_coords(coords: &[[f64; 2]]) -> Option<Self> {
        let first = coords.first()?;
        let mut min = *first;
        let mut max = *first;
        for c in coords.iter().skip(1) {
            min[0] = min[0].min(c[0]);
            min[1] = min[1].min(c[1]);
            max[0] = max[0].max(c[0]);
            max[1] = max[1].max(c[1]);
        }
        Some(Self::new(min, max))
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min[0] && lon <= self.max[0] && lat >= self.min[1] && lat <= self.max[1]
    }
}
