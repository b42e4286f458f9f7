use std::path::PathBuf;

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::geo::ObserverLocation;
use crate::predict::{deserialize_duration, PassConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub tle: TleConfig,
    /// Search window length, starting now unless overridden.
    #[serde(default = "default_window", deserialize_with = "deserialize_duration")]
    pub window: Duration,
    #[serde(default)]
    pub predict: PassConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            station: StationConfig::default(),
            tle: TleConfig::default(),
            window: default_window(),
            predict: PassConfig::default(),
        }
    }
}

fn default_window() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            name: Some("Berlin".to_string()),
            coordinates: "52.5200, 13.4050".to_string(),
            altitude_m: 0.0,
        }
    }
}

impl StationConfig {
    pub fn observer(&self) -> Result<ObserverLocation, ConfigError> {
        ObserverLocation::from_coordinates(&self.coordinates, Some(self.altitude_m)).ok_or_else(
            || ConfigError::Invalid(format!("station coordinates '{}'", self.coordinates)),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TleConfig {
    /// TLE files or directories of `.tle` / `.txt` files.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Satellites to track by name. Empty means every loaded satellite.
    #[serde(default)]
    pub satellites: Vec<String>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.station.observer()?;
        if self.tle.paths.is_empty() {
            return Err(ConfigError::Invalid("no TLE paths configured".into()));
        }
        if self.window <= Duration::zero() {
            return Err(ConfigError::Invalid("window must be positive".into()));
        }
        self.predict
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
