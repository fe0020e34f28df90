//! Marker declutter for the settlement layer.
//!
//! Globally significant settlements always survive; the rest are limited to
//! one per coarse lat/lon grid cell. The full gazetteer stays untouched and is
//! still what nearest-settlement queries scan.

use std::borrow::Cow;
use std::collections::HashSet;

use foundation::math::canonical_lon_deg;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gazetteer::GazetteerEntry;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinningPolicy {
    /// Entries with `rank <= major_rank_max` are major.
    pub major_rank_max: i32,
    /// Entries with `population >= major_population_min` are major.
    pub major_population_min: u64,
    /// Grid cell size in degrees (both axes).
    pub cell_deg: f64,
    /// Rank assumed when an entry has none.
    pub default_rank: i32,
}

impl Default for ThinningPolicy {
    fn default() -> Self {
        Self {
            major_rank_max: 3,
            major_population_min: 1_000_000,
            cell_deg: 5.0,
            default_rank: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThinningPolicyError {
    #[error("thinning cell size must be a positive finite number of degrees, got {0}")]
    InvalidCellSize(f64),
}

impl ThinningPolicy {
    /// Checks that the grid is well formed. `cell_of` assumes a valid policy.
    pub fn validate(&self) -> Result<(), ThinningPolicyError> {
        if !(self.cell_deg.is_finite() && self.cell_deg > 0.0) {
            return Err(ThinningPolicyError::InvalidCellSize(self.cell_deg));
        }
        Ok(())
    }

    pub fn is_major(&self, entry: &GazetteerEntry) -> bool {
        let rank = entry.rank.unwrap_or(self.default_rank);
        let population = entry.population.unwrap_or(0);
        rank <= self.major_rank_max || population >= self.major_population_min
    }

    /// Grid cell `(lat_cell, lon_cell)` of an entry.
    pub fn cell_of(&self, entry: &GazetteerEntry) -> (i64, i64) {
        let lat_cell = ((entry.lat_deg + 90.0) / self.cell_deg).floor() as i64;
        let lon_cell = ((canonical_lon_deg(entry.lon_deg) + 180.0) / self.cell_deg).floor() as i64;
        (lat_cell, lon_cell)
    }
}

/// Order-preserving filtered view over a gazetteer slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinnedSet<'a> {
    source: &'a [GazetteerEntry],
    kept: Cow<'a, [usize]>,
}

impl<'a> ThinnedSet<'a> {
    pub(crate) fn from_indices(source: &'a [GazetteerEntry], kept: Vec<usize>) -> Self {
        Self {
            source,
            kept: Cow::Owned(kept),
        }
    }

    pub(crate) fn from_borrowed(source: &'a [GazetteerEntry], kept: &'a [usize]) -> Self {
        Self {
            source,
            kept: Cow::Borrowed(kept),
        }
    }

    /// Indices of kept entries in the source slice, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.kept
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a GazetteerEntry> + '_ {
        let source = self.source;
        self.kept.iter().map(move |&i| &source[i])
    }

    pub fn to_vec(&self) -> Vec<GazetteerEntry> {
        self.iter().cloned().collect()
    }
}

/// Thins with the default policy (rank <= 3 or population >= 1M, 5° cells).
pub fn thin(gazetteer: &[GazetteerEntry]) -> ThinnedSet<'_> {
    thin_with(gazetteer, &ThinningPolicy::default())
}

pub fn thin_with<'a>(gazetteer: &'a [GazetteerEntry], policy: &ThinningPolicy) -> ThinnedSet<'a> {
    ThinnedSet::from_indices(gazetteer, thin_indices(gazetteer, policy))
}

pub(crate) fn thin_indices(gazetteer: &[GazetteerEntry], policy: &ThinningPolicy) -> Vec<usize> {
    let mut kept = Vec::new();
    let mut occupied: HashSet<(i64, i64)> = HashSet::new();

    for (i, entry) in gazetteer.iter().enumerate() {
        if policy.is_major(entry) || occupied.insert(policy.cell_of(entry)) {
            kept.push(i);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::{ThinningPolicy, ThinningPolicyError, thin, thin_with};
    use crate::gazetteer::GazetteerEntry;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn sample() -> Vec<GazetteerEntry> {
        vec![
            GazetteerEntry::new("Minor A", "X", 45.1, 9.1),
            GazetteerEntry::new("Minor B", "X", 45.2, 9.2),
            GazetteerEntry::new("Capital", "X", 45.3, 9.3).with_rank(1),
            GazetteerEntry::new("Metro", "X", 45.4, 9.4).with_population(2_500_000),
            GazetteerEntry::new("Minor C", "X", -33.0, 151.0).with_rank(7),
            GazetteerEntry::new("Minor D", "X", -33.5, 151.2).with_population(10_000),
            GazetteerEntry::new("Rank four", "X", 45.0, 9.0).with_rank(4),
        ]
    }

    #[test]
    fn keeps_majors_and_first_minor_per_cell() {
        let gaz = sample();
        let thinned = thin(&gaz);
        let names: Vec<&str> = thinned.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Minor A", "Capital", "Metro", "Minor C"]);
        assert_eq!(thinned.indices(), &[0, 2, 3, 4]);
    }

    #[test]
    fn invariants_hold() {
        let gaz = sample();
        let policy = ThinningPolicy::default();
        let thinned = thin(&gaz);

        for (i, e) in gaz.iter().enumerate() {
            if policy.is_major(e) {
                assert!(thinned.indices().contains(&i), "major {} dropped", e.name);
            }
        }

        let mut cells = HashSet::new();
        for e in thinned.iter().filter(|e| !policy.is_major(e)) {
            assert!(cells.insert(policy.cell_of(e)), "two minors in one cell");
        }
    }

    #[test]
    fn seam_longitudes_share_canonical_cell() {
        let gaz = vec![
            GazetteerEntry::new("East edge", "X", 0.0, 180.0),
            GazetteerEntry::new("West edge", "X", 0.0, -180.0),
        ];
        // -180 canonicalizes to 180, so both land in the same cell.
        assert_eq!(thin(&gaz).len(), 1);
    }

    #[test]
    fn custom_policy() {
        let gaz = sample();
        let policy = ThinningPolicy {
            major_rank_max: 0,
            major_population_min: u64::MAX,
            cell_deg: 90.0,
            default_rank: 10,
        };
        let names: Vec<String> = thin_with(&gaz, &policy).iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["Minor A".to_string(), "Minor C".to_string()]);
    }

    #[test]
    fn degenerate_cell_sizes_are_rejected() {
        assert_eq!(ThinningPolicy::default().validate(), Ok(()));
        for cell_deg in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let policy = ThinningPolicy {
                cell_deg,
                ..ThinningPolicy::default()
            };
            assert!(matches!(
                policy.validate(),
                Err(ThinningPolicyError::InvalidCellSize(_))
            ));
        }
    }

    #[test]
    fn empty_and_deterministic() {
        assert!(thin(&[]).is_empty());
        let gaz = sample();
        assert_eq!(thin(&gaz), thin(&gaz));
    }
}
