//! Spread command implementation.
//!
//! Named pairs come from the configured registry; `--short`/`--long` build a
//! custom spread without registering it.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::spreads::SpreadSeries;

use crate::commands::parse_maturity;
use crate::error::CliError;
use crate::output::{display_opt, print_header, print_output};
use crate::session::Session;

const DEFAULT_PAIR: &str = "10Y-2Y";

/// Arguments for the spread command.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    /// Named spread pair. Defaults to 10Y-2Y.
    #[arg(long, conflicts_with_all = ["short", "all"])]
    pub pair: Option<String>,

    /// Short leg of a custom spread
    #[arg(long, requires = "long")]
    pub short: Option<String>,

    /// Long leg of a custom spread
    #[arg(long, requires = "short")]
    pub long: Option<String>,

    /// Summarize every registered pair
    #[arg(long)]
    pub all: bool,

    /// List the registered pairs and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct SpreadRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Spread (pp)", display_with = "display_opt")]
    spread: Option<f64>,
}

#[derive(Debug, Serialize, Tabled)]
struct PairRow {
    #[tabled(rename = "Pair")]
    name: String,
    #[tabled(rename = "Short")]
    short_leg: String,
    #[tabled(rename = "Long")]
    long_leg: String,
}

#[derive(Debug, Serialize, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Latest", display_with = "display_opt")]
    latest: Option<f64>,
    #[tabled(rename = "Min", display_with = "display_opt")]
    min: Option<f64>,
    #[tabled(rename = "Max", display_with = "display_opt")]
    max: Option<f64>,
    #[tabled(rename = "Mean", display_with = "display_opt")]
    mean: Option<f64>,
    #[tabled(rename = "Days < 0")]
    inverted_days: usize,
}

impl SummaryRow {
    fn from_series(series: &SpreadSeries) -> Self {
        let values: Vec<f64> = series.defined().map(|(_, v)| v).collect();
        let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);
        Self {
            pair: series.pair.name.clone(),
            latest: series.latest().map(|(_, v)| v),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
            mean,
            inverted_days: values.iter().filter(|v| **v < 0.0).count(),
        }
    }
}

/// Executes the spread command.
pub fn execute(args: SpreadArgs, session: &Session) -> Result<()> {
    let engine = session.config.analytics.spread_engine();

    if args.list {
        let rows: Vec<PairRow> = engine
            .registry()
            .pairs()
            .iter()
            .map(|p| PairRow {
                name: p.name.clone(),
                short_leg: p.short_leg.to_string(),
                long_leg: p.long_leg.to_string(),
            })
            .collect();
        return print_output(&rows, session.format);
    }

    let table = session.load_table()?;

    if args.all {
        let rows: Vec<SummaryRow> = engine
            .all_named(&table)?
            .iter()
            .map(SummaryRow::from_series)
            .collect();
        if session.decorated() {
            print_header("Spread summary");
        }
        return print_output(&rows, session.format);
    }

    let series = match (args.short.as_deref(), args.long.as_deref()) {
        (Some(short), Some(long)) => {
            engine.custom_spread(&table, parse_maturity(short)?, parse_maturity(long)?)?
        }
        (None, None) => engine.named_spread(&table, args.pair.as_deref().unwrap_or(DEFAULT_PAIR))?,
        _ => return Err(CliError::MissingArgument("--short and --long".to_string()).into()),
    };

    if session.decorated() {
        print_header(&format!(
            "Spread {} ({} minus {})",
            series.pair.name, series.pair.long_leg, series.pair.short_leg
        ));
    }

    let rows: Vec<SpreadRow> = series
        .points
        .iter()
        .map(|p| SpreadRow {
            date: p.date.to_string(),
            spread: p.value,
        })
        .collect();
    print_output(&rows, session.format)
}
