//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    ConfigArgs, CurveArgs, FactorsArgs, HeatmapArgs, MacroArgs, RegimesArgs, SpreadArgs, VolArgs,
};

/// CurveLab - Treasury yield curve analytics CLI
#[derive(Parser)]
#[command(name = "curvelab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Zero-coupon curve CSV (overrides the configured path)
    #[arg(short, long, env = "CURVELAB_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// Preamble lines before the CSV header (the published GSW file has 9)
    #[arg(long, global = true)]
    pub skip_lines: Option<usize>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, env = "CURVELAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the curve on a date, optionally against another date
    Curve(CurveArgs),

    /// Maturity spreads (named pairs or custom legs)
    Spread(SpreadArgs),

    /// Level, slope and curvature factors
    Factors(FactorsArgs),

    /// Rolling realized volatility of daily yield changes
    Vol(VolArgs),

    /// Curve-shape regimes, their timeline and shares
    Regimes(RegimesArgs),

    /// Macro series aligned to the curve dates
    Macro(MacroArgs),

    /// Date by maturity yield levels or daily changes
    Heatmap(HeatmapArgs),

    /// Manage configuration files
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
