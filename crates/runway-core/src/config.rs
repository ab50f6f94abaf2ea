//! Engine configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/runway/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Tunables of the projection engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Months rolled forward by the balance timeline
    pub overview_horizon: u32,
    /// Trailing months in the surplus history, current month included
    pub surplus_window_months: u32,
    /// Forecast length when the stored profile has no positive duration
    pub default_forecast_years: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overview_horizon: 30,
            surplus_window_months: 6,
            default_forecast_years: 10,
        }
    }
}

impl EngineConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path; a missing file means embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("runway").join("config").join("engine.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<EngineConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    overview: Option<RawOverview>,
    surplus: Option<RawSurplus>,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawOverview {
    horizon_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawSurplus {
    window_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_years: Option<u32>,
}

fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(horizon) = raw.overview.and_then(|o| o.horizon_months) {
        config.overview_horizon = horizon;
    }
    if let Some(window) = raw.surplus.and_then(|s| s.window_months) {
        config.surplus_window_months = window;
    }
    if let Some(years) = raw.forecast.and_then(|f| f.default_years) {
        config.default_forecast_years = years;
    }

    if config.overview_horizon == 0 {
        return Err(Error::Config("overview.horizon_months must be positive".into()));
    }
    if config.surplus_window_months == 0 {
        return Err(Error::Config("surplus.window_months must be positive".into()));
    }
    if !(1..=100).contains(&config.default_forecast_years) {
        return Err(Error::Config(
            "forecast.default_years must be between 1 and 100".into(),
        ));
    }

    Ok(config)
}
