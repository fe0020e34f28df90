//! Point resolution for the globe picker: sphere pick -> lat/lon -> continent,
//! country and nearest settlement, plus the settlement declutter used for
//! marker rendering.

pub mod containment;
pub mod gazetteer;
pub mod geometry;
pub mod locator;
pub mod nearest;
pub mod regions;
pub mod thinning;

pub use containment::contains;
pub use gazetteer::GazetteerEntry;
pub use geometry::{Polygon, PolygonGeometry, Ring};
pub use locator::{Locator, ResolvedLocation};
pub use nearest::{NearbySettlement, nearest, within_radius};
pub use regions::{Feature, LabelKeys, UNKNOWN, find_containing, resolve};
pub use thinning::{ThinnedSet, ThinningPolicy, ThinningPolicyError, thin, thin_with};
