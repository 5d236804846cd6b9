//! Heatmap command implementation.

use anyhow::Result;
use clap::Args;

use curvelab_analytics::heatmap::{Heatmap, HeatmapUnit};

use crate::cli::OutputFormat;
use crate::output::{display_bp, display_opt, print_info, print_matrix, print_single};
use crate::session::Session;

/// Arguments for the heatmap command.
#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// Day-over-day changes in basis points instead of levels
    #[arg(long)]
    pub changes: bool,
}

/// Executes the heatmap command.
pub fn execute(args: HeatmapArgs, session: &Session) -> Result<()> {
    let table = session.load_table()?;
    let heatmap = if args.changes {
        Heatmap::changes_bp(&table)
    } else {
        Heatmap::levels(&table)
    };

    if session.format == OutputFormat::Json {
        return print_single(&heatmap, session.format);
    }

    let header: Vec<String> = std::iter::once("Date".to_string())
        .chain(heatmap.maturities.iter().map(ToString::to_string))
        .collect();

    let format_cell: fn(&Option<f64>) -> String = match heatmap.unit {
        HeatmapUnit::Percent => display_opt,
        HeatmapUnit::BasisPoints => display_bp,
    };
    let rows: Vec<Vec<String>> = heatmap
        .dates
        .iter()
        .zip(&heatmap.cells)
        .map(|(date, row)| {
            std::iter::once(date.to_string())
                .chain(row.iter().map(format_cell))
                .collect()
        })
        .collect();

    print_matrix(&header, &rows, session.format)?;

    if let (true, Some((lo, hi))) = (session.decorated(), heatmap.range()) {
        let unit = match heatmap.unit {
            HeatmapUnit::Percent => "%",
            HeatmapUnit::BasisPoints => "bp",
        };
        print_info(&format!("Range {lo:.2}{unit} to {hi:.2}{unit}"));
    }
    Ok(())
}
