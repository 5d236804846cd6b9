//! CLI command implementations.

pub mod config;
pub mod curve;
pub mod factors;
pub mod heatmap;
pub mod macro_overlay;
pub mod regimes;
pub mod spread;
pub mod vol;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use curve::CurveArgs;
pub use factors::FactorsArgs;
pub use heatmap::HeatmapArgs;
pub use macro_overlay::MacroArgs;
pub use regimes::RegimesArgs;
pub use spread::SpreadArgs;
pub use vol::VolArgs;

use curvelab_core::{CurveTable, Date, Maturity};

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s.trim()).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Parses a maturity label such as `3M` or `10Y`.
pub fn parse_maturity(s: &str) -> CliResult<Maturity> {
    Maturity::parse(s).map_err(|_| CliError::InvalidMaturity(s.to_string()))
}

/// Resolves an optional `--date` to a date present in the table, defaulting
/// to the last one.
pub fn resolve_date(table: &CurveTable, date: Option<&str>) -> CliResult<Date> {
    match date {
        Some(s) => {
            let date = parse_date(s)?;
            table
                .date_index(date)
                .map(|_| date)
                .ok_or_else(|| CliError::DateNotFound(date.to_string()))
        }
        None => table
            .last_date()
            .ok_or_else(|| CliError::DateNotFound("latest".to_string())),
    }
}
