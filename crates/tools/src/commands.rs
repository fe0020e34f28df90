use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use formats::{SourceFile, VectorCollection, gazetteer_collection, gazetteer_entries, region_features};
use foundation::math::{GeoPoint, Vec3};
use locator::Locator;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Cli, Command};
use crate::config::Settings;

/// One row of `atlas nearby` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyRow {
    pub name: String,
    pub country: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub distance_km: f64,
}

pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let settings = Settings::resolve(&cli)?;

    match cli.command {
        Command::Resolve { lat, lon } => {
            let point = GeoPoint::try_new(lat, lon)?;
            let locator = load_locator(&settings)?;
            write_json(out, &locator.resolve(point))
        }
        Command::Pick { x, y, z } => {
            let hit = Vec3::new(x, y, z);
            if hit.normalized().is_none() {
                warn!(x, y, z, "degenerate pick vector; resolving (0, 0)");
            }
            let locator = load_locator(&settings)?;
            write_json(out, &locator.resolve_pick(hit))
        }
        Command::Nearby {
            lat,
            lon,
            radius_km,
            limit,
        } => {
            if !radius_km.is_finite() || radius_km < 0.0 {
                bail!("--radius-km must be a non-negative number, got {radius_km}");
            }
            let point = GeoPoint::try_new(lat, lon)?;
            let locator = load_locator(&settings)?;
            let rows: Vec<NearbyRow> = locator
                .nearby(point, radius_km)
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|hit| NearbyRow {
                    name: hit.entry.name.clone(),
                    country: hit.entry.country.clone(),
                    lat_deg: hit.entry.lat_deg,
                    lon_deg: hit.entry.lon_deg,
                    distance_km: hit.distance_km,
                })
                .collect();
            write_json(out, &rows)
        }
        Command::Thin {
            out: path,
            cell_deg,
        } => {
            let mut policy = settings.thinning;
            if let Some(cell_deg) = cell_deg {
                policy.cell_deg = cell_deg;
                policy.validate().context("--cell-deg")?;
            }

            let mut locator = Locator::new();
            locator.set_gazetteer(load_gazetteer(&settings.cities)?);
            locator.set_thinning_policy(policy);

            let thinned = locator.thinned();
            info!(
                kept = thinned.len(),
                total = locator.gazetteer().len(),
                "thinned settlements"
            );
            let payload = gazetteer_collection(thinned.iter()).to_geojson_string_pretty()?;

            match path {
                Some(path) => {
                    fs::write(&path, payload)
                        .with_context(|| format!("write {}", path.display()))?;
                    eprintln!("wrote {}", path.display());
                    Ok(())
                }
                None => {
                    writeln!(out, "{payload}")?;
                    Ok(())
                }
            }
        }
    }
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn load_locator(settings: &Settings) -> anyhow::Result<Locator> {
    let mut locator = Locator::new()
        .with_label_keys(settings.continent_keys.clone(), settings.country_keys.clone())
        .with_thinning_policy(settings.thinning);
    locator.set_continents(region_features(load_collection(&settings.continents)?));
    locator.set_countries(region_features(load_collection(&settings.countries)?));
    locator.set_gazetteer(load_gazetteer(&settings.cities)?);

    if !locator.is_ready() {
        warn!("reference data incomplete; unresolved labels will read Unknown");
    }
    Ok(locator)
}

fn load_gazetteer(path: &Path) -> anyhow::Result<Vec<locator::GazetteerEntry>> {
    Ok(gazetteer_entries(load_collection(path)?))
}

/// A missing file reads as an empty collection; any other failure is an error.
fn load_collection(path: &Path) -> anyhow::Result<VectorCollection> {
    if !path.exists() {
        warn!(path = %path.display(), "reference file not found; treating as empty");
        return Ok(VectorCollection::default());
    }
    let source = SourceFile::load(path).with_context(|| format!("load {}", path.display()))?;
    Ok(source.collection)
}
