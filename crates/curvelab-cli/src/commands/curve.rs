//! Curve command implementation.
//!
//! Shows the curve on one date, or its change against a base date.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::snapshot::{compare, CurveSnapshot};
use curvelab_core::Date;

use crate::commands::resolve_date;
use crate::error::CliError;
use crate::output::{display_bp, display_opt, print_header, print_output};
use crate::session::Session;

/// Arguments for the curve command.
#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Curve date (YYYY-MM-DD). Defaults to the latest date.
    #[arg(long)]
    pub date: Option<String>,

    /// Base date to compare against (YYYY-MM-DD)
    #[arg(long)]
    pub compare: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct CurveRow {
    #[tabled(rename = "Maturity")]
    maturity: String,
    #[tabled(rename = "Yield (%)", display_with = "display_opt")]
    #[serde(rename = "yield")]
    value: Option<f64>,
    #[tabled(rename = "Base (%)", display_with = "display_opt")]
    base: Option<f64>,
    #[tabled(rename = "Change (bp)", display_with = "display_bp")]
    change_bp: Option<f64>,
}

/// Executes the curve command.
pub fn execute(args: CurveArgs, session: &Session) -> Result<()> {
    let table = session.load_table()?;
    let date = resolve_date(&table, args.date.as_deref())?;

    let rows: Vec<CurveRow> = match args.compare.as_deref() {
        Some(base) => {
            let base = resolve_date(&table, Some(base))?;
            let comparison =
                compare(&table, date, base).ok_or_else(|| not_found(date, base))?;
            if session.decorated() {
                print_header(&format!("Curve {date} vs {base}"));
            }
            comparison
                .points
                .into_iter()
                .map(|p| CurveRow {
                    maturity: p.maturity.to_string(),
                    value: p.value,
                    base: p.base_value,
                    change_bp: p.change_bp,
                })
                .collect()
        }
        None => {
            let snapshot = CurveSnapshot::at(&table, date)
                .ok_or_else(|| CliError::DateNotFound(date.to_string()))?;
            if session.decorated() {
                print_header(&format!("Curve {date}"));
            }
            snapshot
                .points
                .into_iter()
                .map(|p| CurveRow {
                    maturity: p.maturity.to_string(),
                    value: Some(p.value),
                    base: None,
                    change_bp: None,
                })
                .collect()
        }
    };

    print_output(&rows, session.format)
}

fn not_found(date: Date, base: Date) -> CliError {
    CliError::DateNotFound(format!("{date} or {base}"))
}
