//! Config command implementation.
//!
//! Shows the effective configuration, writes a starter file, and checks a
//! file against the validation rules.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use curvelab_config::CurveLabConfig;

use crate::cli::OutputFormat;
use crate::output::{print_header, print_output, print_success, KeyValue};
use crate::session::Session;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a starter configuration file
    Init(InitArgs),

    /// Check a configuration file
    Validate(ValidateArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination (`.json` for JSON, TOML otherwise)
    #[arg(default_value = "curvelab.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// File to check
    pub path: PathBuf,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, session: &Session) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(session),
        ConfigCommand::Init(init_args) => execute_init(&init_args),
        ConfigCommand::Validate(validate_args) => execute_validate(&validate_args),
    }
}

fn summary(config: &CurveLabConfig) -> Vec<KeyValue> {
    let analytics = &config.analytics;
    let anchors = &analytics.anchors;
    let vol = &analytics.volatility;

    let mut rows = vec![
        KeyValue::new(
            "data.curve_csv",
            config
                .data
                .curve_csv
                .as_ref()
                .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string()),
        ),
        KeyValue::new("data.skip_lines", config.data.skip_lines.to_string()),
        KeyValue::new(
            "data.macro_dir",
            config
                .data
                .macro_dir
                .as_ref()
                .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string()),
        ),
        KeyValue::new(
            "analytics.anchors",
            format!("{} / {} / {}", anchors.short, anchors.mid, anchors.long),
        ),
        KeyValue::new("analytics.volatility.window", vol.window.to_string()),
        KeyValue::new("analytics.volatility.scale", vol.scale.to_string()),
        KeyValue::new(
            "analytics.volatility.annualization",
            vol.annualization
                .map_or_else(|| "none".to_string(), |p| p.to_string()),
        ),
        KeyValue::new("analytics.regimes.high", analytics.regimes.high.to_string()),
        KeyValue::new("analytics.regimes.low", analytics.regimes.low.to_string()),
        KeyValue::new(
            "analytics.regimes.curvature",
            analytics.regimes.curvature.to_string(),
        ),
        KeyValue::new(
            "analytics.market_regimes",
            format!(
                "level {} / {}, vol {}",
                analytics.market_regimes.level_low,
                analytics.market_regimes.level_high,
                analytics.market_regimes.vol_high
            ),
        ),
    ];
    rows.extend(analytics.spread_pairs.iter().map(|p| {
        KeyValue::new(
            format!("analytics.spread_pairs.{}", p.name),
            format!("{} - {}", p.long_leg, p.short_leg),
        )
    }));
    rows.push(KeyValue::new(
        "macro.recession_series",
        config.macro_catalogue.recession_series.clone(),
    ));
    rows.push(KeyValue::new(
        "macro.series",
        config
            .macro_catalogue
            .series
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    ));
    rows
}

/// Show the configuration in effect.
fn execute_show(session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Json => {
            println!("{}", session.config.to_json()?);
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => {
            if session.decorated() {
                print_header("Current Configuration");
            }
            print_output(&summary(&session.config), session.format)
        }
    }
}

/// Write a starter file with the defaults and the FRED catalogue.
fn execute_init(args: &InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    CurveLabConfig::default().write_to(&args.path)?;
    print_success(&format!("Wrote {}", args.path.display()));
    Ok(())
}

/// Load a file; parsing runs every validation rule.
fn execute_validate(args: &ValidateArgs) -> Result<()> {
    CurveLabConfig::from_file(&args.path)?;
    print_success(&format!("{} is valid", args.path.display()));
    Ok(())
}
