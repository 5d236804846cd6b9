//! Per-invocation state shared by the commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use curvelab_config::CurveLabConfig;
use curvelab_core::{CurveTable, Date};

use crate::cli::{Cli, OutputFormat};
use crate::commands::parse_date;
use crate::error::CliError;

/// Global options resolved against the configuration file.
#[derive(Debug, Clone)]
pub struct Session {
    /// Loaded (or default) configuration.
    pub config: CurveLabConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Suppress informational output.
    pub quiet: bool,
    data: Option<PathBuf>,
    skip_lines: usize,
    from: Option<Date>,
    to: Option<Date>,
}

impl Session {
    /// Resolves the global options. `--data` and `--skip-lines` override the
    /// configured values.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => CurveLabConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => CurveLabConfig::default(),
        };

        let from = cli.from.as_deref().map(parse_date).transpose()?;
        let to = cli.to.as_deref().map(parse_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CliError::InvalidRange {
                    from: from.to_string(),
                    to: to.to_string(),
                }
                .into());
            }
        }

        let data = cli.data.clone().or_else(|| config.data.curve_csv.clone());
        let skip_lines = cli.skip_lines.unwrap_or(config.data.skip_lines);

        Ok(Self {
            config,
            format: cli.format,
            quiet: cli.quiet,
            data,
            skip_lines,
            from,
            to,
        })
    }

    /// Whether headers and notes go to stdout alongside the results.
    pub fn decorated(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Table
    }

    /// Curve file in effect.
    pub fn data_path(&self) -> Result<&Path> {
        self.data.as_deref().ok_or_else(|| CliError::MissingData.into())
    }

    /// Loads the curve table and restricts it to `--from`/`--to`.
    pub fn load_table(&self) -> Result<CurveTable> {
        let path = self.data_path()?;
        let table = curvelab_ext_file::load_curve_csv(path, self.skip_lines)
            .with_context(|| format!("loading curve data {}", path.display()))?;

        let table = match (self.from, self.to, table.first_date(), table.last_date()) {
            (None, None, _, _) | (_, _, None, _) | (_, _, _, None) => table,
            (from, to, Some(first), Some(last)) => {
                table.slice(from.unwrap_or(first), to.unwrap_or(last))
            }
        };

        tracing::info!(
            rows = table.len(),
            maturities = table.maturities().len(),
            "curve table ready"
        );
        Ok(table)
    }
}
