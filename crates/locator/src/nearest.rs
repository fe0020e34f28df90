use foundation::math::{GeoPoint, haversine_km, stable_total_cmp_f64};

use crate::gazetteer::GazetteerEntry;

/// A gazetteer entry together with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySettlement<'a> {
    /// Position of `entry` in the scanned slice.
    pub index: usize,
    pub entry: &'a GazetteerEntry,
    pub distance_km: f64,
}

/// Nearest settlement by great-circle distance.
///
/// Full linear scan; on equal distances the entry earliest in `gazetteer`
/// wins. `None` only for an empty gazetteer.
pub fn nearest(point: GeoPoint, gazetteer: &[GazetteerEntry]) -> Option<NearbySettlement<'_>> {
    let mut best: Option<NearbySettlement<'_>> = None;
    for (index, entry) in gazetteer.iter().enumerate() {
        let distance_km = haversine_km(point, entry.point());
        if best.map(|b| distance_km < b.distance_km).unwrap_or(true) {
            best = Some(NearbySettlement {
                index,
                entry,
                distance_km,
            });
        }
    }
    best
}

/// Every settlement within `radius_km` (inclusive), closest first.
///
/// Equal distances keep input order.
pub fn within_radius(
    point: GeoPoint,
    gazetteer: &[GazetteerEntry],
    radius_km: f64,
) -> Vec<NearbySettlement<'_>> {
    let mut out: Vec<NearbySettlement<'_>> = gazetteer
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let distance_km = haversine_km(point, entry.point());
            (distance_km <= radius_km).then_some(NearbySettlement {
                index,
                entry,
                distance_km,
            })
        })
        .collect();

    // Stable sort: ties stay in input order.
    out.sort_by(|a, b| stable_total_cmp_f64(a.distance_km, b.distance_km));
    out
}
