use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "atlas", version, about = "Resolve globe picks to continent, country and nearest settlement")]
pub struct Cli {
    /// Optional JSON config file (label keys, thinning policy, data paths)
    #[arg(long, env = "ATLAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Continent polygons (GeoJSON FeatureCollection)
    #[arg(long, env = "ATLAS_CONTINENTS")]
    pub continents: Option<PathBuf>,

    /// Country polygons (GeoJSON FeatureCollection)
    #[arg(long, env = "ATLAS_COUNTRIES")]
    pub countries: Option<PathBuf>,

    /// Settlement points (GeoJSON FeatureCollection)
    #[arg(long, env = "ATLAS_CITIES")]
    pub cities: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a latitude/longitude
    Resolve {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Resolve a point on the rendered sphere
    Pick {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
    },

    /// List settlements within a radius, closest first
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, default_value_t = 250.0)]
        radius_km: f64,

        /// Max number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Write the decluttered settlement subset as GeoJSON
    Thin {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Grid cell size in degrees (overrides config)
        #[arg(long)]
        cell_deg: Option<f64>,
    },
}
