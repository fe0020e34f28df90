use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use locator::{LabelKeys, ThinningPolicy};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_CONTINENTS: &str = "data/continents.geojson";
pub const DEFAULT_COUNTRIES: &str = "data/countries.geojson";
pub const DEFAULT_CITIES: &str = "data/cities.geojson";

/// Contents of the optional `--config` JSON file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub continents: Option<PathBuf>,
    pub countries: Option<PathBuf>,
    pub cities: Option<PathBuf>,
    pub continent_keys: Option<LabelKeys>,
    pub country_keys: Option<LabelKeys>,
    pub thinning: Option<ThinningPolicy>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let payload =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&payload).with_context(|| format!("parse config {}", path.display()))
    }
}

/// Effective settings: flags (and their env vars) over the config file over
/// built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub continents: PathBuf,
    pub countries: PathBuf,
    pub cities: PathBuf,
    pub continent_keys: LabelKeys,
    pub country_keys: LabelKeys,
    pub thinning: ThinningPolicy,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let settings = Self::merge(cli, file);
        settings
            .thinning
            .validate()
            .context("invalid thinning policy in config")?;
        Ok(settings)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Self {
        Self {
            continents: cli
                .continents
                .clone()
                .or(file.continents)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTINENTS)),
            countries: cli
                .countries
                .clone()
                .or(file.countries)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COUNTRIES)),
            cities: cli
                .cities
                .clone()
                .or(file.cities)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CITIES)),
            continent_keys: file.continent_keys.unwrap_or_else(LabelKeys::continents),
            country_keys: file.country_keys.unwrap_or_else(LabelKeys::countries),
            thinning: file.thinning.unwrap_or_default(),
        }
    }
}
