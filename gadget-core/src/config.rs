use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{ResolvedLocation, Units};

/// Gadget configuration stored on disk.
///
/// Written by the configuration flow after the user picks a geocoded
/// candidate and a unit system; read before every weather fetch. All fields
/// are optional so an absent or half-written file degrades to the
/// "not configured" state instead of an error.
///
/// Example TOML:
/// name = "Paris"
/// country = "FR"
/// lat = 48.85
/// lon = 2.35
/// units = "metric"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GadgetConfig {
    pub name: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub units: Option<Units>,
}

impl GadgetConfig {
    /// True when latitude, longitude and units are all present. Anything
    /// less and the gadget must prompt for configuration instead of fetching.
    pub fn is_configured(&self) -> bool {
        self.lat.is_some() && self.lon.is_some() && self.units.is_some()
    }

    /// The resolved location driving weather fetches, if fully configured.
    pub fn resolved_location(&self) -> Option<ResolvedLocation> {
        match (self.lat, self.lon, self.units) {
            (Some(lat), Some(lon), Some(units)) => Some(ResolvedLocation {
                name: self.name.clone(),
                state: self.state.clone(),
                country: self.country.clone(),
                lat,
                lon,
                units,
            }),
            _ => None,
        }
    }

    /// Replace the stored location with a newly selected one.
    pub fn set_location(&mut self, location: ResolvedLocation) {
        self.name = location.name;
        self.state = location.state;
        self.country = location.country;
        self.lat = Some(location.lat);
        self.lon = Some(location.lon);
        self.units = Some(location.units);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: GadgetConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-gadget", "gadget-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
