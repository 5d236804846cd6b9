//! Macro command implementation.
//!
//! Aligns a macro series onto the curve dates by carrying the last known
//! observation forward. A series that cannot be found is reported as
//! unavailable rather than failing the command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::factors::FactorEngine;
use curvelab_analytics::macro_join::{
    diagnostics, recession_intervals, MacroJoin, MacroSeries, Provenance,
    RECESSION_MAX_GAP_DAYS, RECESSION_THRESHOLD,
};
use curvelab_analytics::regimes::RegimeEngine;
use curvelab_ext_file::{create_macro_source, MacroSource};

use crate::error::CliError;
use crate::output::{
    display_opt, display_or_missing, print_header, print_output, print_warning,
};
use crate::session::Session;

/// Arguments for the macro command.
#[derive(Args, Debug)]
pub struct MacroArgs {
    /// Series id (e.g. DFF, UNRATE)
    #[arg(long)]
    pub series: Option<String>,

    /// Directory of `<ID>.csv` files (overrides the configuration)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Show level, slope and regime next to the macro value
    #[arg(long)]
    pub diagnostics: bool,

    /// Recession intervals from the configured indicator
    #[arg(long, conflicts_with_all = ["series", "diagnostics", "list"])]
    pub recessions: bool,

    /// List the catalogue and which series are on disk
    #[arg(long, conflicts_with_all = ["series", "diagnostics"])]
    pub list: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct OverlayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Value", display_with = "display_opt")]
    value: Option<f64>,
    #[tabled(rename = "Observed", display_with = "display_or_missing")]
    source_date: Option<String>,
    #[tabled(rename = "Status")]
    provenance: String,
}

#[derive(Debug, Serialize, Tabled)]
struct DiagnosticOutputRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Macro", display_with = "display_opt")]
    macro_value: Option<f64>,
    #[tabled(rename = "Level", display_with = "display_opt")]
    level: Option<f64>,
    #[tabled(rename = "Slope", display_with = "display_opt")]
    slope: Option<f64>,
    #[tabled(rename = "Regime", display_with = "display_or_missing")]
    regime: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct RecessionRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Days")]
    days: i64,
}

#[derive(Debug, Serialize, Tabled)]
struct CatalogueRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "On disk")]
    available: bool,
}

/// Executes the macro command.
pub fn execute(args: MacroArgs, session: &Session) -> Result<()> {
    let catalogue = &session.config.macro_catalogue;
    let dir = args.dir.clone().or_else(|| session.config.data.macro_dir.clone());
    let source = create_macro_source(dir.as_deref());

    if args.list {
        let on_disk = source.available().unwrap_or_else(|e| {
            print_warning(&format!("Cannot list macro directory: {e}"));
            Vec::new()
        });
        let rows: Vec<CatalogueRow> = catalogue
            .series
            .iter()
            .map(|s| CatalogueRow {
                id: s.id.clone(),
                label: s.label.clone(),
                available: on_disk.iter().any(|id| id.eq_ignore_ascii_case(&s.id)),
            })
            .collect();
        return print_output(&rows, session.format);
    }

    if args.recessions {
        let id = catalogue.recession_series.as_str();
        let Some(indicator) = load_series(source.as_ref(), id, catalogue.label_for(id))? else {
            print_warning(&format!("Recession indicator {id} is unavailable"));
            return print_output::<RecessionRow>(&[], session.format);
        };
        let rows: Vec<RecessionRow> =
            recession_intervals(&indicator, RECESSION_THRESHOLD, RECESSION_MAX_GAP_DAYS)
                .into_iter()
                .map(|r| RecessionRow {
                    start: r.start.to_string(),
                    end: r.end.to_string(),
                    days: r.end - r.start,
                })
                .collect();
        if session.decorated() {
            print_header(&format!("Recessions ({})", catalogue.label_for(id)));
        }
        return print_output(&rows, session.format);
    }

    let id = args
        .series
        .as_deref()
        .ok_or_else(|| CliError::MissingArgument("--series".to_string()))?;
    let label = catalogue.label_for(id);
    let series = load_series(source.as_ref(), id, label)?;
    if series.is_none() {
        print_warning(&format!("Macro series {id} is unavailable"));
    }

    let table = session.load_table()?;
    let overlay = MacroJoin::align(table.dates(), series.as_ref());
    tracing::info!(
        series = id,
        joined = overlay.joined_count(),
        dates = overlay.points.len(),
        "macro overlay aligned"
    );

    if args.diagnostics {
        let analytics = &session.config.analytics;
        let factors = FactorEngine::decompose(&table, &analytics.anchors)?;
        let regimes = RegimeEngine::classify(&factors, &analytics.regimes)?;
        if session.decorated() {
            print_header(&format!("{label} vs curve factors"));
        }
        let rows: Vec<DiagnosticOutputRow> = diagnostics(&overlay, &factors, &regimes)
            .into_iter()
            .map(|d| DiagnosticOutputRow {
                date: d.date.to_string(),
                macro_value: d.macro_value,
                level: d.level,
                slope: d.slope,
                regime: d.regime.map(|r| r.to_string()),
            })
            .collect();
        return print_output(&rows, session.format);
    }

    if session.decorated() {
        print_header(label);
    }
    let rows: Vec<OverlayRow> = overlay
        .points
        .iter()
        .map(|p| OverlayRow {
            date: p.date.to_string(),
            value: p.value,
            source_date: p.source_date.map(|d| d.to_string()),
            provenance: match p.provenance {
                Provenance::Joined => "joined".to_string(),
                Provenance::Unavailable => "unavailable".to_string(),
            },
        })
        .collect();
    print_output(&rows, session.format)
}

fn load_series(source: &dyn MacroSource, id: &str, label: &str) -> Result<Option<MacroSeries>> {
    Ok(source.series(id)?.map(|s| s.with_label(label)))
}
