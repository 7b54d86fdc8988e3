use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::diagnostics::{LoadError, SourceInfo};
use super::LogLevel;

/// Config file as written: every field optional, defaults are applied when
/// converting to [`super::Config`].
#[derive(Debug, Default, Deserialize)]
pub struct PartialConfig {
    pub logging: Option<PartialLoggingConfig>,
    pub params: Option<PartialCheckParams>,
    pub agent: Option<PartialAgentParams>,

    /// Source information for error reporting (not serialized)
    #[serde(skip)]
    pub source: Option<SourceInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartialLoggingConfig {
    pub level: Option<toml::Spanned<LogLevel>>,
    pub overrides: Option<HashMap<String, toml::Spanned<LogLevel>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialCheckParams {
    /// Kept as a raw value: unknown choices fall back instead of failing
    pub present: Option<toml::Spanned<toml::Value>>,
    #[serde(rename = "showHFunit")]
    pub show_hanfun_units: Option<bool>,
    pub hkr: Option<PartialThermostatParams>,
    pub humidity: Option<PartialHumidityParams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialThermostatParams {
    pub hkr_bat_always: Option<bool>,
    pub hkr_warn: Option<PartialThermostatLevels>,
    pub hkr_crit: Option<PartialThermostatLevels>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialThermostatLevels {
    pub hkr_diff_soll: Option<toml::Spanned<f64>>,
    pub hkr_bat_below: Option<toml::Spanned<f64>>,
    pub hkr_flag_error: Option<bool>,
    pub hkr_flag_battery: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialHumidityParams {
    pub humidity_warn: Option<PartialHumidityBand>,
    pub humidity_crit: Option<PartialHumidityBand>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialHumidityBand {
    pub higher_than: Option<toml::Spanned<f64>>,
    pub lower_than: Option<toml::Spanned<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialAgentParams {
    pub username: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<toml::Spanned<String>>,
    pub ignore_ssl: Option<bool>,
}

impl PartialConfig {
    /// Load a single config file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config = Self::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            error: e,
        })?;

        config.source = Some(SourceInfo {
            file_path: path.to_path_buf(),
            content,
        });

        Ok(config)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// True if the file did not set anything
    pub fn is_empty(&self) -> bool {
        self.logging.is_none() && self.params.is_none() && self.agent.is_none()
    }
}
