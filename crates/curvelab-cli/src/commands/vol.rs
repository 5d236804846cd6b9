//! Vol command implementation.
//!
//! With `--maturity`, prints the rolling series for that maturity; without
//! it, the latest value for every maturity in the file.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::volatility::{
    VolatilityEngine, VolatilitySpec, BASIS_POINTS, TRADING_DAYS_PER_YEAR,
};

use crate::commands::parse_maturity;
use crate::output::{display_opt, display_or_missing, print_header, print_output};
use crate::session::Session;

/// Arguments for the vol command.
#[derive(Args, Debug)]
pub struct VolArgs {
    /// Maturity to compute (e.g. 10Y). Omit for a cross-section of latest values.
    #[arg(long)]
    pub maturity: Option<String>,

    /// Number of valid daily changes per window
    #[arg(long)]
    pub window: Option<usize>,

    /// Units of the result
    #[arg(long, value_enum)]
    pub units: Option<VolUnits>,

    /// Annualize by the square root of 252 trading days
    #[arg(long)]
    pub annualize: bool,
}

/// Volatility units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VolUnits {
    /// Basis points
    Bp,
    /// Percentage points
    Pp,
}

#[derive(Debug, Serialize, Tabled)]
struct VolRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Volatility", display_with = "display_opt")]
    volatility: Option<f64>,
}

#[derive(Debug, Serialize, Tabled)]
struct LatestRow {
    #[tabled(rename = "Maturity")]
    maturity: String,
    #[tabled(rename = "As of", display_with = "display_or_missing")]
    date: Option<String>,
    #[tabled(rename = "Volatility", display_with = "display_opt")]
    volatility: Option<f64>,
}

fn resolve_spec(args: &VolArgs, base: VolatilitySpec) -> VolatilitySpec {
    let mut spec = base;
    if let Some(window) = args.window {
        spec.window = window;
    }
    match args.units {
        Some(VolUnits::Bp) => spec.scale = BASIS_POINTS,
        Some(VolUnits::Pp) => spec.scale = 1.0,
        None => {}
    }
    if args.annualize {
        spec.annualization = Some(TRADING_DAYS_PER_YEAR);
    }
    spec
}

fn unit_label(spec: &VolatilitySpec) -> String {
    let units = if (spec.scale - BASIS_POINTS).abs() < f64::EPSILON {
        "bp".to_string()
    } else if (spec.scale - 1.0).abs() < f64::EPSILON {
        "pp".to_string()
    } else {
        format!("x{}", spec.scale)
    };
    match spec.annualization {
        Some(periods) => format!("{units}, annualized over {periods}"),
        None => format!("{units}, daily"),
    }
}

/// Executes the vol command.
pub fn execute(args: VolArgs, session: &Session) -> Result<()> {
    let spec = resolve_spec(&args, session.config.analytics.volatility);
    spec.validate()?;
    let table = session.load_table()?;

    if let Some(label) = args.maturity.as_deref() {
        let maturity = parse_maturity(label)?;
        let series = VolatilityEngine::rolling_vol_with(&table, maturity, spec)?;
        if session.decorated() {
            print_header(&format!(
                "{maturity} volatility ({} changes, {})",
                spec.window,
                unit_label(&spec)
            ));
        }
        let rows: Vec<VolRow> = series
            .points
            .iter()
            .map(|p| VolRow {
                date: p.date.to_string(),
                volatility: p.value,
            })
            .collect();
        return print_output(&rows, session.format);
    }

    let all = VolatilityEngine::rolling_vol_all(&table, spec)?;
    if session.decorated() {
        print_header(&format!(
            "Latest volatility ({} changes, {})",
            spec.window,
            unit_label(&spec)
        ));
    }
    let rows: Vec<LatestRow> = all
        .iter()
        .map(|series| {
            let latest = series.latest();
            LatestRow {
                maturity: series.maturity.to_string(),
                date: latest.map(|(d, _)| d.to_string()),
                volatility: latest.map(|(_, v)| v),
            }
        })
        .collect();
    print_output(&rows, session.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> VolArgs {
        VolArgs {
            maturity: None,
            window: None,
            units: None,
            annualize: false,
        }
    }

    #[test]
    fn test_resolve_spec_overrides() {
        let base = VolatilitySpec::new(21).in_basis_points();
        assert_eq!(resolve_spec(&args(), base), base);

        let spec = resolve_spec(
            &VolArgs {
                window: Some(63),
                units: Some(VolUnits::Pp),
                annualize: true,
                ..args()
            },
            base,
        );
        assert_eq!(spec.window, 63);
        assert!((spec.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(spec.annualization, Some(252));
        assert_eq!(unit_label(&spec), "pp, annualized over 252");
        assert_eq!(unit_label(&base), "bp, daily");
    }
}
