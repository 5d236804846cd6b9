//! CurveLab CLI - Command-line interface for Treasury yield curve analytics.
//!
//! # Usage
//!
//! ```bash
//! # Curve on the latest date, against a base date
//! curvelab --data feds200628.csv --skip-lines 9 curve --compare 2024-01-02
//!
//! # 10Y-2Y spread over a window
//! curvelab -d feds200628.csv --from 2022-01-01 spread --pair 10Y-2Y
//!
//! # Regime timeline with a configuration file
//! curvelab -c curvelab.toml regimes --timeline
//!
//! # Fed funds aligned to the curve dates
//! curvelab -c curvelab.toml macro --series DFF --diagnostics
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;
mod session;

use cli::{Cli, Commands};
use session::Session;

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table/JSON/CSV output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(cli.verbose).into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("CurveLab v{}", env!("CARGO_PKG_VERSION"));

    let session = Session::from_cli(&cli)?;

    // Execute command
    match cli.command {
        Commands::Curve(args) => commands::curve::execute(args, &session)?,
        Commands::Spread(args) => commands::spread::execute(args, &session)?,
        Commands::Factors(args) => commands::factors::execute(args, &session)?,
        Commands::Vol(args) => commands::vol::execute(args, &session)?,
        Commands::Regimes(args) => commands::regimes::execute(args, &session)?,
        Commands::Macro(args) => commands::macro_overlay::execute(args, &session)?,
        Commands::Heatmap(args) => commands::heatmap::execute(args, &session)?,
        Commands::Config(args) => commands::config::execute(args, &session)?,
    }

    Ok(())
}
