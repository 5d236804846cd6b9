//! Top-level configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::sources::{DataConfig, MacroCatalogue};

/// Everything a CurveLab session is configured by.
///
/// Loaded from TOML (or JSON, by file extension); every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveLabConfig {
    /// Data locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Transform settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Macro series catalogue.
    #[serde(default, rename = "macro")]
    pub macro_catalogue: MacroCatalogue,
}

impl CurveLabConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a configuration file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let config = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the configuration, choosing the format by extension.
    pub fn write_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            self.to_json()?
        } else {
            self.to_toml()?
        };
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl Validate for CurveLabConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .analytics
            .validate()
            .into_iter()
            .map(|e| e.nested("analytics"))
            .collect();

        errors.extend(
            self.macro_catalogue
                .validate()
                .into_iter()
                .map(|e| e.nested("macro")),
        );

        errors
    }
}
