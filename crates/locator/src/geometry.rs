//! Prepared polygon geometry in plain (lon, lat) degrees.
//!
//! Rings keep their authored coordinates. A polygon that hops across the
//! antimeridian additionally carries a seam-continuous copy, so the
//! containment test can stay a plain even-odd ray cast over both.

use foundation::bounds::LonLatBounds;

/// Longitude step (degrees) above which an edge may be a seam hop.
const SEAM_JUMP_DEG: f64 = 180.0;

/// A hop across the seam must be shorter than this once wrapped; longer
/// edges are read as authored.
const SEAM_HOP_MAX_DEG: f64 = 90.0;

/// A closed ring of at least three finite `[lon, lat]` vertices.
///
/// No closing duplicate vertex is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    coords: Vec<[f64; 2]>,
    bounds: LonLatBounds,
}

impl Ring {
    /// Prepares a ring; `None` when it has fewer than 3 usable vertices or
    /// any non-finite coordinate.
    pub fn new(raw: &[[f64; 2]]) -> Option<Self> {
        if raw.iter().any(|c| !c[0].is_finite() || !c[1].is_finite()) {
            return None;
        }

        let mut coords = raw.to_vec();
        drop_closing_duplicate(&mut coords);
        if coords.len() < 3 {
            return None;
        }

        let bounds = LonLatBounds::from_coords(&coords)?;
        Some(Self { coords, bounds })
    }

    pub fn coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    pub fn bounds(&self) -> LonLatBounds {
        self.bounds
    }

    /// Seam-continuous copy of the ring, if it hops across the antimeridian.
    ///
    /// `None` when no edge hops the seam, when the continuous walk does not
    /// close (the ring goes around a pole) or when the result has no width.
    pub fn unwrapped(&self) -> Option<Ring> {
        let coords = &self.coords;
        let n = coords.len();
        let mut offset = 0.0;
        let mut shifted = false;
        let mut out = Vec::with_capacity(n);
        out.push(coords[0]);

        for i in 1..n {
            offset += seam_correction(coords[i - 1][0], coords[i][0]);
            shifted |= offset != 0.0;
            out.push([coords[i][0] + offset, coords[i][1]]);
        }

        if !shifted {
            return None;
        }
        if offset + seam_correction(coords[n - 1][0], coords[0][0]) != 0.0 {
            return None;
        }

        let bounds = LonLatBounds::from_coords(&out)?;
        if bounds.max[0] - bounds.min[0] <= 0.0 {
            return None;
        }
        Some(Ring { coords: out, bounds })
    }

    fn center_lon(&self) -> f64 {
        (self.bounds.min[0] + self.bounds.max[0]) * 0.5
    }

    fn shift_lon(&mut self, offset: f64) {
        if offset == 0.0 {
            return;
        }
        for c in &mut self.coords {
            c[0] += offset;
        }
        self.bounds.min[0] += offset;
        self.bounds.max[0] += offset;
    }
}

/// One outer ring plus zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    outer: Ring,
    holes: Vec<Ring>,
    seam_view: Option<Box<Polygon>>,
}

impl Polygon {
    /// Builds a polygon from GeoJSON-style rings (first = outer, rest = holes).
    ///
    /// A malformed outer ring disables the whole polygon; malformed holes are
    /// dropped.
    pub fn from_rings(rings: &[Vec<[f64; 2]>]) -> Option<Self> {
        let (outer_raw, holes_raw) = rings.split_first()?;
        let outer = Ring::new(outer_raw)?;
        let holes: Vec<Ring> = holes_raw.iter().filter_map(|raw| Ring::new(raw)).collect();
        let seam_view = seam_view(&outer, &holes).map(Box::new);

        Some(Self {
            outer,
            holes,
            seam_view,
        })
    }

    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// The polygon with every seam-hopping ring unwrapped and holes moved by
    /// whole turns next to the outer ring. Present only when some ring hops
    /// the seam.
    pub fn seam_view(&self) -> Option<&Polygon> {
        self.seam_view.as_deref()
    }
}

fn seam_view(outer: &Ring, holes: &[Ring]) -> Option<Polygon> {
    let outer_unwrapped = outer.unwrapped();
    let holes_unwrapped: Vec<Option<Ring>> = holes.iter().map(Ring::unwrapped).collect();
    if outer_unwrapped.is_none() && holes_unwrapped.iter().all(Option::is_none) {
        return None;
    }

    let outer = outer_unwrapped.unwrap_or_else(|| outer.clone());
    let anchor = outer.center_lon();
    let holes = holes
        .iter()
        .zip(holes_unwrapped)
        .map(|(raw, unwrapped)| {
            let mut hole = unwrapped.unwrap_or_else(|| raw.clone());
            let turns = ((anchor - hole.center_lon()) / 360.0).round();
            hole.shift_lon(turns * 360.0);
            hole
        })
        .collect();

    Some(Polygon {
        outer,
        holes,
        seam_view: None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolygonGeometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl PolygonGeometry {
    /// Single polygon; `None` if its outer ring is unusable.
    pub fn polygon(rings: &[Vec<[f64; 2]>]) -> Option<Self> {
        Polygon::from_rings(rings).map(PolygonGeometry::Polygon)
    }

    /// Multi-polygon keeping only the usable groups, in order. `None` when no
    /// group survives.
    pub fn multi_polygon(polygons: &[Vec<Vec<[f64; 2]>>]) -> Option<Self> {
        let groups: Vec<Polygon> = polygons
            .iter()
            .filter_map(|rings| Polygon::from_rings(rings))
            .collect();
        if groups.is_empty() {
            return None;
        }
        Some(PolygonGeometry::MultiPolygon(groups))
    }

    pub fn polygons(&self) -> &[Polygon] {
        match self {
            PolygonGeometry::Polygon(p) => std::slice::from_ref(p),
            PolygonGeometry::MultiPolygon(ps) => ps,
        }
    }
}

fn drop_closing_duplicate(coords: &mut Vec<[f64; 2]>) {
    if coords.len() >= 2 {
        let first = coords[0];
        let last = coords[coords.len() - 1];
        if (first[0] - last[0]).abs() < 1e-9 && (first[1] - last[1]).abs() < 1e-9 {
            coords.pop();
        }
    }
}

/// Whole turns to add to `to` so the edge `from -> to` becomes a short hop
/// across the seam; 0 for edges read as authored.
///
/// Edges between two vertices on the ±180 border run along the map edge and
/// are never hops.
fn seam_correction(from: f64, to: f64) -> f64 {
    let step = to - from;
    if step.abs() <= SEAM_JUMP_DEG {
        return 0.0;
    }
    if from.abs() == 180.0 && to.abs() == 180.0 {
        return 0.0;
    }
    let correction = -360.0 * (step / 360.0).round();
    if (step + correction).abs() < SEAM_HOP_MAX_DEG {
        correction
    } else {
        0.0
    }
}
