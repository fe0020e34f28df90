use foundation::math::GeoPoint;

use crate::geometry::{Polygon, PolygonGeometry, Ring};

/// Antimeridian-safe point-in-polygon test.
///
/// The even-odd test runs for the canonical longitude and for the same
/// longitude shifted by ±360°, so a point on either side of the seam matches
/// geometry authored on the other side. Each polygon is tested as authored
/// and, when it hops the seam, through its seam view. The point is inside
/// when any candidate is inside either form of any polygon group (outer
/// ring, minus holes).
pub fn contains(point: GeoPoint, geometry: &PolygonGeometry) -> bool {
    let lat = point.lat_deg;
    candidate_lons(point.lon_deg).into_iter().any(|lon| {
        geometry
            .polygons()
            .iter()
            .any(|polygon| polygon_contains(polygon, lon, lat))
    })
}

fn candidate_lons(lon: f64) -> [f64; 3] {
    [lon, lon + 360.0, lon - 360.0]
}

fn polygon_contains(polygon: &Polygon, lon: f64, lat: f64) -> bool {
    rings_contain(polygon, lon, lat)
        || polygon
            .seam_view()
            .is_some_and(|view| rings_contain(view, lon, lat))
}

fn rings_contain(polygon: &Polygon, lon: f64, lat: f64) -> bool {
    if !ring_contains(polygon.outer(), lon, lat) {
        return false;
    }
    !polygon
        .holes()
        .iter()
        .any(|hole| ring_contains(hole, lon, lat))
}

fn ring_contains(ring: &Ring, lon: f64, lat: f64) -> bool {
    if !ring.bounds().contains(lon, lat) {
        return false;
    }
    point_in_ring(lon, lat, ring.coords())
}

/// Even-odd crossing test against a ray towards +lon.
fn point_in_ring(lon: f64, lat: f64, coords: &[[f64; 2]]) -> bool {
    let n = coords.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = coords[i];
        let [xj, yj] = coords[j];
        // The straddle check guarantees yj != yi.
        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::{contains, point_in_ring};
    use crate::geometry::PolygonGeometry;
    use foundation::math::GeoPoint;

    fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Vec<[f64; 2]> {
        vec![
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
            [min_lon, min_lat],
        ]
    }

    #[test]
    fn plain_rectangle() {
        let geom = PolygonGeometry::polygon(&[rect(6.0, 36.0, 19.0, 47.0)]).unwrap();
        assert!(contains(GeoPoint::new(45.0, 9.0), &geom));
        assert!(!contains(GeoPoint::new(45.0, 20.0), &geom));
        assert!(!contains(GeoPoint::new(30.0, 9.0), &geom));
    }

    #[test]
    fn concave_ring() {
        // U shape open to the north.
        let ring = vec![
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
        ];
        assert!(point_in_ring(0.5, 2.0, &ring));
        assert!(!point_in_ring(1.5, 2.0, &ring));
        assert!(point_in_ring(1.5, 0.5, &ring));
    }

    #[test]
    fn hole_excludes_point() {
        let geom = PolygonGeometry::polygon(&[
            rect(0.0, 0.0, 10.0, 10.0),
            rect(4.0, 4.0, 6.0, 6.0),
        ])
        .unwrap();
        assert!(!contains(GeoPoint::new(5.0, 5.0), &geom));
        assert!(contains(GeoPoint::new(2.0, 2.0), &geom));
    }

    #[test]
    fn multi_polygon_any_group() {
        let geom = PolygonGeometry::multi_polygon(&[
            vec![rect(0.0, 0.0, 1.0, 1.0)],
            vec![rect(10.0, 10.0, 11.0, 11.0)],
        ])
        .unwrap();
        assert!(contains(GeoPoint::new(10.5, 10.5), &geom));
        assert!(contains(GeoPoint::new(0.5, 0.5), &geom));
        assert!(!contains(GeoPoint::new(5.0, 5.0), &geom));
    }

    #[test]
    fn seam_strip_contains_points_on_both_sides() {
        let geom = PolygonGeometry::polygon(&[vec![
            [179.5, -1.0],
            [-179.5, -1.0],
            [-179.5, 1.0],
            [179.5, 1.0],
        ]])
        .unwrap();
        assert!(contains(GeoPoint::new(0.0, 179.99), &geom));
        assert!(contains(GeoPoint::new(0.0, -179.8), &geom));
        assert!(contains(GeoPoint::new(0.0, 180.0), &geom));
        assert!(!contains(GeoPoint::new(5.0, 179.99), &geom));
    }

    #[test]
    fn whole_world_rectangle_contains_everything() {
        let geom = PolygonGeometry::polygon(&[rect(-180.0, -90.0, 180.0, 90.0)]).unwrap();
        for (lat, lon) in [(10.0, 10.0), (0.0, 0.0), (-45.0, -170.0), (60.0, 179.5)] {
            assert!(contains(GeoPoint::new(lat, lon), &geom), "({lat}, {lon})");
        }
    }

    #[test]
    fn wide_band_keeps_authored_extent() {
        let geom = PolygonGeometry::polygon(&[rect(-100.0, -10.0, 100.0, 10.0)]).unwrap();
        assert!(contains(GeoPoint::new(0.0, 0.0), &geom));
        assert!(contains(GeoPoint::new(0.0, -99.0), &geom));
        assert!(!contains(GeoPoint::new(0.0, 150.0), &geom));
        assert!(!contains(GeoPoint::new(0.0, -150.0), &geom));
    }

    #[test]
    fn seam_hole_excludes_point_on_far_side() {
        let geom = PolygonGeometry::polygon(&[
            vec![[170.0, -10.0], [-170.0, -10.0], [-170.0, 10.0], [170.0, 10.0]],
            vec![[-178.0, -1.0], [-176.0, -1.0], [-176.0, 1.0], [-178.0, 1.0]],
        ])
        .unwrap();
        assert!(!contains(GeoPoint::new(0.0, -177.0), &geom));
        assert!(contains(GeoPoint::new(0.0, 175.0), &geom));
        assert!(contains(GeoPoint::new(5.0, -175.0), &geom));
    }

    #[test]
    fn polygon_authored_past_the_seam() {
        // Coordinates beyond 180 as some datasets store dateline regions.
        let geom = PolygonGeometry::polygon(&[rect(179.0, -5.0, 181.0, 5.0)]).unwrap();
        assert!(contains(GeoPoint::new(0.0, 179.9), &geom));
        assert!(contains(GeoPoint::new(0.0, -179.9), &geom));
        assert!(!contains(GeoPoint::new(0.0, -178.0), &geom));
    }

    #[test]
    fn polar_ring_contains_pole_side() {
        let geom = PolygonGeometry::polygon(&[vec![
            [-180.0, -90.0],
            [-180.0, -70.0],
            [-90.0, -70.0],
            [0.0, -70.0],
            [90.0, -70.0],
            [180.0, -70.0],
            [180.0, -90.0],
            [-180.0, -90.0],
        ]])
        .unwrap();
        assert!(contains(GeoPoint::new(-80.0, 45.0), &geom));
        assert!(contains(GeoPoint::new(-80.0, -135.0), &geom));
        assert!(!contains(GeoPoint::new(-60.0, 45.0), &geom));
    }

    #[test]
    fn degenerate_ring_never_contains() {
        assert!(!point_in_ring(0.0, 0.0, &[[0.0, 0.0], [1.0, 1.0]]));
        assert!(PolygonGeometry::polygon(&[vec![[0.0, 0.0], [1.0, 1.0]]]).is_none());
    }

    #[test]
    fn repeated_calls_agree_on_boundary() {
        let geom = PolygonGeometry::polygon(&[rect(0.0, 0.0, 10.0, 10.0)]).unwrap();
        let p = GeoPoint::new(0.0, 5.0);
        let first = contains(p, &geom);
        for _ in 0..10 {
            assert_eq!(contains(p, &geom), first);
        }
    }
}
