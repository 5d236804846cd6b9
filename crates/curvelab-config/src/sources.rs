//! Data source locations and the macro series catalogue.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Where curve and macro data are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Curve CSV file.
    #[serde(default)]
    pub curve_csv: Option<PathBuf>,

    /// Preamble lines before the CSV header.
    #[serde(default)]
    pub skip_lines: usize,

    /// Directory holding `<SERIES_ID>.csv` macro files.
    #[serde(default)]
    pub macro_dir: Option<PathBuf>,
}

/// One macro series the overlay can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSeriesConfig {
    /// Series identifier, e.g. `T10Y2Y`.
    pub id: String,
    /// Display label.
    pub label: String,
}

impl MacroSeriesConfig {
    /// Creates an entry.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Catalogue of macro series plus the recession indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroCatalogue {
    /// Id of the 0/1 recession indicator used for shading.
    #[serde(default = "default_recession_series")]
    pub recession_series: String,

    /// Series available for overlays.
    #[serde(default)]
    pub series: Vec<MacroSeriesConfig>,
}

fn default_recession_series() -> String {
    "USREC".to_string()
}

impl MacroCatalogue {
    /// The FRED series used by the Treasury dashboard.
    pub fn fred() -> Self {
        let series = [
            ("DFF", "Fed Funds"),
            ("DTB3", "3M T-Bill"),
            ("GS10", "10Y CMT"),
            ("T10Y3M", "10Y-3M Spread"),
            ("T10Y2Y", "10Y-2Y Spread"),
            ("T10YIE", "10Y Breakeven Inflation"),
            ("T5YIE", "5Y Breakeven Inflation"),
            ("USREC", "NBER Recession Indicator"),
        ]
        .into_iter()
        .map(|(id, label)| MacroSeriesConfig::new(id, label))
        .collect();

        Self {
            recession_series: default_recession_series(),
            series,
        }
    }

    /// Looks up a series by id (ASCII case-insensitive).
    pub fn get(&self, id: &str) -> Option<&MacroSeriesConfig> {
        self.series.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }

    /// Display label for an id, falling back to the id itself.
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |s| s.label.as_str())
    }

    /// Series ids excluding the recession indicator.
    pub fn overlay_ids(&self) -> Vec<&str> {
        self.series
            .iter()
            .map(|s| s.id.as_str())
            .filter(|id| !id.eq_ignore_ascii_case(&self.recession_series))
            .collect()
    }
}

impl Default for MacroCatalogue {
    fn default() -> Self {
        Self::fred()
    }
}

impl Validate for MacroCatalogue {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (i, entry) in self.series.iter().enumerate() {
            if entry.id.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("series[{i}].id"),
                    "Series id cannot be empty",
                ));
            }
            if self.series[..i]
                .iter()
                .any(|s| s.id.eq_ignore_ascii_case(&entry.id))
            {
                errors.push(ValidationError::with_rule(
                    format!("series[{i}].id"),
                    format!("Duplicate series id '{}'", entry.id),
                    "unique_ids",
                ));
            }
        }

        if self.recession_series.trim().is_empty() {
            errors.push(ValidationError::new(
                "recession_series",
                "Recession series id cannot be empty",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fred_catalogue() {
        let catalogue = MacroCatalogue::fred();
        assert_eq!(catalogue.series.len(), 8);
        assert_eq!(catalogue.label_for("dff"), "Fed Funds");
        assert_eq!(catalogue.label_for("XYZ"), "XYZ");
        assert!(!catalogue.overlay_ids().contains(&"USREC"));
        assert!(catalogue.is_valid());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut catalogue = MacroCatalogue::fred();
        catalogue.series.push(MacroSeriesConfig::new("dff", "again"));
        let errors = catalogue.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("unique_ids"));
    }
}
