use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::SearchLocation, provider::openmeteo};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "WEATHER_CONFIG";

/// Every fixed string the shell and the views display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub page_title: String,
    pub intro: String,
    pub locations_heading: String,
    /// Title of the menu entry that asks for the device position.
    pub current_location_entry: String,
    /// Title given to the location built from a device position.
    pub current_location_title: String,
    pub searching: String,
    pub results_heading: String,
    /// `{lat}` and `{lng}` are replaced with the coordinates.
    pub coordinates: String,
    pub hour_column: String,
    pub temperature_column: String,
    pub precipitation_column: String,
    pub error_prefix: String,
    pub geolocation_unsupported: String,
    pub geolocation_denied: String,
    pub geolocation_failed: String,
    pub missing_coordinates: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            page_title: "Weather browser".into(),
            intro: "Pick a place to see the temperature and precipitation forecast.".into(),
            locations_heading: "Locations".into(),
            current_location_entry: "My location (requires permission)".into(),
            current_location_title: "My Location".into(),
            searching: "Searching...".into(),
            results_heading: "Results".into(),
            coordinates: "Forecast for the day at latitude {lat} and longitude {lng}.".into(),
            hour_column: "Hour".into(),
            temperature_column: "Temperature (°C)".into(),
            precipitation_column: "Precipitation (mm)".into(),
            error_prefix: "Error: ".into(),
            geolocation_unsupported: "Geolocation is not supported here.".into(),
            geolocation_denied: "You declined the request to share your location.".into(),
            geolocation_failed: "Could not get access to your location.".into(),
            missing_coordinates: "This location has no coordinates.".into(),
        }
    }
}

impl Messages {
    pub fn coordinates_sentence(&self, lat: Option<f64>, lng: Option<f64>) -> String {
        let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        self.coordinates
            .replace("{lat}", &show(lat))
            .replace("{lng}", &show(lng))
    }
}

/// Stands in for the platform's geolocation permission and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeolocationConfig {
    /// Whether the user grants access to their position.
    #[serde(default)]
    pub allow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: openmeteo::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("no location is titled '{0}'; the current-location entry is required")]
    MissingCurrentLocationEntry(String),

    #[error("{count} locations are titled '{title}'; exactly one is allowed")]
    DuplicateCurrentLocationEntry { title: String, count: usize },

    #[error("the current-location entry '{0}' must not carry coordinates")]
    CurrentLocationHasCoordinates(String),

    #[error("location '{0}' needs both lat and lng")]
    MissingCoordinates(String),
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drop results of searches that were overtaken by a newer one.
    pub discard_stale: bool,

    /// Example TOML:
    /// [[locations]]
    /// title = "Reykjavík"
    /// lat = 64.1355
    /// lng = -21.8954
    pub locations: Vec<SearchLocation>,

    /// Absent means the device has no geolocation capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeolocationConfig>,

    pub weather: WeatherConfig,

    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        let messages = Messages::default();
        Self {
            discard_stale: true,
            locations: default_locations(&messages.current_location_entry),
            geolocation: None,
            weather: WeatherConfig::default(),
            messages,
        }
    }
}

pub fn default_locations(current_location_entry: &str) -> Vec<SearchLocation> {
    vec![
        SearchLocation::current_position(current_location_entry),
        SearchLocation::new("Reykjavík", 64.1355, -21.8954),
        SearchLocation::new("Akureyri", 65.6835, -18.0878),
        SearchLocation::new("New York", 40.7128, -74.006),
        SearchLocation::new("Tokyo", 35.6764, 139.65),
        SearchLocation::new("Sydney", 33.8688, 151.2093),
    ]
}

impl Config {
    /// Load config from `WEATHER_CONFIG` or the platform path, or return
    /// defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let table: toml::Table = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // The default menu follows a renamed current-location entry.
        if !table.contains_key("locations") {
            cfg.locations = default_locations(&cfg.messages.current_location_entry);
        }

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Exactly one coordinate-less current-location entry; everything else
    /// carries both coordinates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entry = &self.messages.current_location_entry;
        let sentinels: Vec<&SearchLocation> = self
            .locations
            .iter()
            .filter(|l| &l.title == entry)
            .collect();

        match sentinels.as_slice() {
            [] => return Err(ConfigError::MissingCurrentLocationEntry(entry.clone())),
            [only] if only.lat.is_some() || only.lng.is_some() => {
                return Err(ConfigError::CurrentLocationHasCoordinates(entry.clone()));
            }
            [_] => {}
            many => {
                return Err(ConfigError::DuplicateCurrentLocationEntry {
                    title: entry.clone(),
                    count: many.len(),
                });
            }
        }

        if let Some(bad) = self
            .locations
            .iter()
            .find(|l| &l.title != entry && l.coordinates().is_none())
        {
            return Err(ConfigError::MissingCoordinates(bad.title.clone()));
        }

        Ok(())
    }

    /// Grant or revoke geolocation and remember the position it reports.
    pub fn set_geolocation(&mut self, allow: bool, position: Option<(f64, f64)>) {
        self.geolocation = Some(GeolocationConfig {
            allow,
            latitude: position.map(|(lat, _)| lat),
            longitude: position.map(|(_, lng)| lng),
        });
    }
}
