use serde::{Deserialize, Serialize};

use super::precision::canonical_f64;

/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    #[error("coordinate is not finite (lat={lat}, lon={lon})")]
    NotFinite { lat: f64, lon: f64 },
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// Geographic coordinates in degrees.
///
/// Invariant: `lon_deg` is always canonical, i.e. in `(-180, 180]`, and
/// `lat_deg` is in `[-90, 90]`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    /// Builds a point, clamping latitude and canonicalizing longitude.
    ///
    /// Never yields NaN: a NaN latitude and a non-finite longitude read as 0.
    /// Use [`GeoPoint::try_new`] to reject such input instead.
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        let lat_deg = if lat_deg.is_nan() { 0.0 } else { lat_deg };
        let lon_deg = if lon_deg.is_finite() { lon_deg } else { 0.0 };
        Self {
            lat_deg: canonical_f64(lat_deg.clamp(-90.0, 90.0)),
            lon_deg: canonical_lon_deg(lon_deg),
        }
    }

    /// Strict constructor for untrusted input: rejects non-finite values and
    /// latitudes outside `[-90, 90]`. Longitude may be any finite value.
    pub fn try_new(lat_deg: f64, lon_deg: f64) -> Result<Self, CoordError> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(CoordError::NotFinite {
                lat: lat_deg,
                lon: lon_deg,
            });
        }
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(CoordError::LatitudeOutOfRange(lat_deg));
        }
        Ok(Self::new(lat_deg, lon_deg))
    }

    pub fn lat_rad(self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn lon_rad(self) -> f64 {
        self.lon_deg.to_radians()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lat {:.4}, lon {:.4}", self.lat_deg, self.lon_deg)
    }
}

/// Maps any longitude into `(-180, 180]`.
///
/// `-180` becomes `180` and `-0.0` becomes `0.0`. Non-finite input is
/// returned unchanged.
pub fn canonical_lon_deg(lon_deg: f64) -> f64 {
    if !lon_deg.is_finite() {
        return lon_deg;
    }
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        canonical_f64(wrapped)
    }
}

/// Signed longitude difference `to - from`, reduced to `(-180, 180]`.
pub fn lon_delta_deg(from_deg: f64, to_deg: f64) -> f64 {
    canonical_lon_deg(to_deg - from_deg)
}

/// Great-circle distance (km) via the haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_rad();
    let lat2 = b.lat_rad();
    let dlat = lat2 - lat1;
    let dlon = lon_delta_deg(a.lon_deg, b.lon_deg).to_radians();

    let s_lat = (dlat * 0.5).sin();
    let s_lon = (dlon * 0.5).sin();
    let h = s_lat * s_lat + lat1.cos() * lat2.cos() * s_lon * s_lon;

    2.0 * EARTH_MEAN_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}
