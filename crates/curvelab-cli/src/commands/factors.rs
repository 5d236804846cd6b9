//! Factors command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::factors::{FactorAnchors, FactorEngine};

use crate::commands::parse_maturity;
use crate::output::{display_opt, print_header, print_output};
use crate::session::Session;

/// Arguments for the factors command.
#[derive(Args, Debug)]
pub struct FactorsArgs {
    /// Short anchor (overrides the configuration)
    #[arg(long)]
    pub short: Option<String>,

    /// Mid anchor (overrides the configuration)
    #[arg(long)]
    pub mid: Option<String>,

    /// Long anchor (overrides the configuration)
    #[arg(long)]
    pub long: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct FactorRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Level", display_with = "display_opt")]
    level: Option<f64>,
    #[tabled(rename = "Slope", display_with = "display_opt")]
    slope: Option<f64>,
    #[tabled(rename = "Curvature", display_with = "display_opt")]
    curvature: Option<f64>,
}

/// Applies command-line anchor overrides to the configured anchors.
pub(crate) fn anchors_with_overrides(
    base: &FactorAnchors,
    short: Option<&str>,
    mid: Option<&str>,
    long: Option<&str>,
) -> Result<FactorAnchors> {
    let mut anchors = base.clone();
    if let Some(s) = short {
        anchors.short = parse_maturity(s)?;
    }
    if let Some(s) = mid {
        anchors.mid = parse_maturity(s)?;
    }
    if let Some(s) = long {
        anchors.long = parse_maturity(s)?;
    }
    Ok(anchors)
}

/// Executes the factors command.
pub fn execute(args: FactorsArgs, session: &Session) -> Result<()> {
    let anchors = anchors_with_overrides(
        &session.config.analytics.anchors,
        args.short.as_deref(),
        args.mid.as_deref(),
        args.long.as_deref(),
    )?;

    let table = session.load_table()?;
    let series = FactorEngine::decompose(&table, &anchors)?;

    if session.decorated() {
        print_header(&format!(
            "Factors (anchors {} / {} / {})",
            anchors.short, anchors.mid, anchors.long
        ));
    }

    let rows: Vec<FactorRow> = series
        .points
        .iter()
        .map(|p| FactorRow {
            date: p.date.to_string(),
            level: p.value.map(|f| f.level),
            slope: p.value.map(|f| f.slope),
            curvature: p.value.map(|f| f.curvature),
        })
        .collect();
    print_output(&rows, session.format)
}
