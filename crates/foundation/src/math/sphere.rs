//! Sphere surface <-> geographic coordinates.
//!
//! Axis convention (aligned with the globe's world texture):
//! - `+y` is the north pole.
//! - lat 0, lon 0 maps to `+x`.
//! - east longitudes have negative `z`.
//!
//! ```text
//! x =  r * cos(lat) * cos(lon)
//! y =  r * sin(lat)
//! z = -r * cos(lat) * sin(lon)
//! ```

use super::geodesy::{GeoPoint, canonical_lon_deg};
use super::vec::Vec3;

/// A point on (or near) a globe of some radius, in renderer units.
pub type SpherePoint = Vec3;

/// Horizontal distance (relative to the vector length) below which the point
/// is treated as a pole and its longitude reported as 0.
const POLE_EPSILON: f64 = 1e-12;

pub fn to_sphere_point(geo: GeoPoint, radius: f64) -> SpherePoint {
    let lat = geo.lat_rad();
    let lon = geo.lon_rad();
    let cos_lat = lat.cos();
    Vec3::new(
        radius * cos_lat * lon.cos(),
        radius * lat.sin(),
        -radius * cos_lat * lon.sin(),
    )
}

/// Converts a pick on the sphere back to geographic coordinates.
///
/// Takes no radius: `v` is normalized by its own length, so picks on a globe
/// of any radius (or slightly above its surface) give the same point.
/// Zero-length or non-finite vectors map to (0, 0); the poles map to
/// longitude 0.
pub fn to_geo_point(v: SpherePoint) -> GeoPoint {
    let Some(n) = v.normalized() else {
        return GeoPoint::default();
    };

    let lat = n.y.clamp(-1.0, 1.0).asin().to_degrees();
    let horizontal = (n.x * n.x + n.z * n.z).sqrt();
    let lon = if horizontal <= POLE_EPSILON {
        0.0
    } else {
        (-n.z).atan2(n.x).to_degrees()
    };

    GeoPoint::new(lat, canonical_lon_deg(lon))
}

#[cfg(test)]
mod tests {
    use super::{to_geo_point, to_sphere_point};
    use crate::math::{GeoPoint, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn prime_meridian_and_east() {
        let p = to_sphere_point(GeoPoint::new(0.0, 0.0), 2.0);
        assert_close(p.x, 2.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 0.0, 1e-12);

        let e = to_sphere_point(GeoPoint::new(0.0, 90.0), 1.0);
        assert_close(e.x, 0.0, 1e-12);
        assert_close(e.z, -1.0, 1e-12);

        let n = to_sphere_point(GeoPoint::new(90.0, 0.0), 1.0);
        assert_close(n.y, 1.0, 1e-12);
    }

    #[test]
    fn round_trip_any_radius() {
        for radius in [0.5, 1.0, 6371.0] {
            for lat in [-89.5, -45.0, 0.0, 12.25, 60.0, 89.5] {
                for lon in [-179.75, -120.0, -0.5, 0.0, 9.0, 135.0, 180.0] {
                    let geo = GeoPoint::new(lat, lon);
                    let back = to_geo_point(to_sphere_point(geo, radius));
                    assert_close(back.lat_deg, geo.lat_deg, 1e-9);
                    assert_close(back.lon_deg, geo.lon_deg, 1e-9);
                }
            }
        }
    }

    #[test]
    fn round_trip_keeps_seam_canonical() {
        let back = to_geo_point(to_sphere_point(GeoPoint::new(10.0, 180.0), 1.0));
        assert!(back.lon_deg > 179.999_999 || back.lon_deg < -179.999_999);
        assert!(back.lon_deg > -180.0 && back.lon_deg <= 180.0);
    }

    #[test]
    fn poles_and_degenerate_vectors_are_deterministic() {
        let north = to_geo_point(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(north, GeoPoint::new(90.0, 0.0));
        let south = to_geo_point(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(south, GeoPoint::new(-90.0, 0.0));

        assert_eq!(to_geo_point(Vec3::new(0.0, 0.0, 0.0)), GeoPoint::default());
        assert_eq!(
            to_geo_point(Vec3::new(f64::NAN, 1.0, 0.0)),
            GeoPoint::default()
        );
    }

    #[test]
    fn picks_above_the_surface_resolve_to_the_same_point() {
        let geo = GeoPoint::new(45.0, 9.0);
        let surface = to_geo_point(to_sphere_point(geo, 1.0));
        let hover = to_geo_point(to_sphere_point(geo, 1.05));
        assert_close(surface.lat_deg, hover.lat_deg, 1e-12);
        assert_close(surface.lon_deg, hover.lon_deg, 1e-12);
    }
}
