use foundation::math::{GeoPoint, SpherePoint, to_geo_point};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::gazetteer::GazetteerEntry;
use crate::nearest::{NearbySettlement, nearest, within_radius};
use crate::regions::{Feature, LabelKeys, UNKNOWN, resolve};
use crate::thinning::{ThinnedSet, ThinningPolicy, thin_indices};

/// Everything the picker reports for one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    pub continent: String,
    pub country: String,
    pub nearest_settlement: String,
    /// Distance to `nearest_settlement`; absent when the gazetteer is empty.
    pub distance_km: Option<f64>,
}

/// Holds the reference data and answers pick queries against it.
///
/// Any collection may be empty (not loaded yet); queries then report
/// [`UNKNOWN`]. The thinned settlement view is computed on first use and
/// dropped whenever the gazetteer or the thinning policy is replaced.
#[derive(Debug)]
pub struct Locator {
    continents: Vec<Feature>,
    countries: Vec<Feature>,
    gazetteer: Vec<GazetteerEntry>,
    continent_keys: LabelKeys,
    country_keys: LabelKeys,
    policy: ThinningPolicy,
    thinned: OnceCell<Vec<usize>>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Self {
            continents: Vec::new(),
            countries: Vec::new(),
            gazetteer: Vec::new(),
            continent_keys: LabelKeys::continents(),
            country_keys: LabelKeys::countries(),
            policy: ThinningPolicy::default(),
            thinned: OnceCell::new(),
        }
    }

    pub fn with_label_keys(mut self, continents: LabelKeys, countries: LabelKeys) -> Self {
        self.continent_keys = continents;
        self.country_keys = countries;
        self
    }

    pub fn with_thinning_policy(mut self, policy: ThinningPolicy) -> Self {
        self.set_thinning_policy(policy);
        self
    }

    pub fn set_continents(&mut self, features: Vec<Feature>) {
        debug!(count = features.len(), "continent features replaced");
        self.continents = features;
    }

    pub fn set_countries(&mut self, features: Vec<Feature>) {
        debug!(count = features.len(), "country features replaced");
        self.countries = features;
    }

    pub fn set_gazetteer(&mut self, entries: Vec<GazetteerEntry>) {
        debug!(count = entries.len(), "gazetteer replaced");
        self.gazetteer = entries;
        self.thinned = OnceCell::new();
    }

    pub fn set_thinning_policy(&mut self, policy: ThinningPolicy) {
        self.policy = policy;
        self.thinned = OnceCell::new();
    }

    pub fn continents(&self) -> &[Feature] {
        &self.continents
    }

    pub fn countries(&self) -> &[Feature] {
        &self.countries
    }

    pub fn gazetteer(&self) -> &[GazetteerEntry] {
        &self.gazetteer
    }

    /// True once all three reference collections hold data.
    pub fn is_ready(&self) -> bool {
        !self.continents.is_empty() && !self.countries.is_empty() && !self.gazetteer.is_empty()
    }

    /// Labels `point` with continent, country and nearest settlement.
    ///
    /// The nearest settlement is searched in the full gazetteer, never in the
    /// thinned view.
    pub fn resolve(&self, point: GeoPoint) -> ResolvedLocation {
        let continent = resolve(point, &self.continents, &self.continent_keys);
        let country = resolve(point, &self.countries, &self.country_keys);
        let nearest = nearest(point, &self.gazetteer);

        let (nearest_settlement, distance_km) = match nearest {
            Some(hit) => (hit.entry.name.as_str(), Some(hit.distance_km)),
            None => (UNKNOWN, None),
        };
        trace!(%point, continent, country, nearest_settlement, "resolved pick");

        ResolvedLocation {
            point,
            continent: continent.to_string(),
            country: country.to_string(),
            nearest_settlement: nearest_settlement.to_string(),
            distance_km,
        }
    }

    /// Resolves a pick on the globe surface.
    pub fn resolve_pick(&self, hit: SpherePoint) -> ResolvedLocation {
        self.resolve(to_geo_point(hit))
    }

    pub fn nearest(&self, point: GeoPoint) -> Option<NearbySettlement<'_>> {
        nearest(point, &self.gazetteer)
    }

    pub fn nearby(&self, point: GeoPoint, radius_km: f64) -> Vec<NearbySettlement<'_>> {
        within_radius(point, &self.gazetteer, radius_km)
    }

    /// Render subset of the gazetteer, memoized per gazetteer.
    pub fn thinned(&self) -> ThinnedSet<'_> {
        let kept = self.thinned.get_or_init(|| {
            let kept = thin_indices(&self.gazetteer, &self.policy);
            debug!(kept = kept.len(), total = self.gazetteer.len(), "thinned settlements");
            kept
        });
        ThinnedSet::from_borrowed(&self.gazetteer, kept)
    }
}
