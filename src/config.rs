// ⚙️ Configuration - settings as data
// JSON file first, then BAZI_* environment variables on top

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::ChartSettings;
use crate::solar_time::DEFAULT_REFERENCE_MERIDIAN;

pub const ENV_REFERENCE_MERIDIAN: &str = "BAZI_REFERENCE_MERIDIAN";
pub const ENV_SOLAR_TERMS: &str = "BAZI_SOLAR_TERMS";
pub const ENV_LUNAR_MONTHS: &str = "BAZI_LUNAR_MONTHS";
pub const ENV_BIND_ADDR: &str = "BAZI_BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SOLAR_TERMS: &str = "data/solar_terms.csv";
const DEFAULT_LUNAR_MONTHS: &str = "data/lunar_months.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Meridian the civil clock is set to, in degrees east (120 = UTC+8)
    pub reference_meridian: f64,

    /// CSV of solar-term instants: year,term,instant
    pub solar_terms_path: PathBuf,

    /// CSV of lunar month starts: lunar_year,month,leap,start
    pub lunar_months_path: PathBuf,

    /// Server listen address
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reference_meridian: DEFAULT_REFERENCE_MERIDIAN,
            solar_terms_path: PathBuf::from(DEFAULT_SOLAR_TERMS),
            lunar_months_path: PathBuf::from(DEFAULT_LUNAR_MONTHS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Load config from JSON file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Defaults (or the given file) with environment overrides applied
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Config::from_file(p)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BAZI_*` overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_REFERENCE_MERIDIAN) {
            self.reference_meridian = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not a number: {:?}", ENV_REFERENCE_MERIDIAN, raw))?;
        }
        if let Some(path) = lookup(ENV_SOLAR_TERMS) {
            self.solar_terms_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_LUNAR_MONTHS) {
            self.lunar_months_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        Ok(())
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            reference_meridian: self.reference_meridian,
        }
    }
}
