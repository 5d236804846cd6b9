//! Regimes command implementation.
//!
//! Classifies each date from the factor slope and curvature. `--timeline`
//! collapses the labels into segments, `--shares` reports the distribution.
//! `--market` adds the rate level and rolling volatility of the maturity
//! closest to 10Y, and combines them with the slope into a market regime.

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvelab_analytics::factors::{FactorEngine, FactorSeries};
use curvelab_analytics::market_regimes::{MarketRegimeEngine, MarketRegimeQuantiles};
use curvelab_analytics::regimes::{RegimeEngine, RegimeThresholds};
use curvelab_analytics::volatility::VolatilityEngine;
use curvelab_core::CurveTable;

use crate::commands::factors::anchors_with_overrides;
use crate::commands::parse_maturity;
use crate::output::{display_opt, display_or_missing, print_header, print_info, print_output};
use crate::session::Session;

/// Arguments for the regimes command.
#[derive(Args, Debug)]
pub struct RegimesArgs {
    /// Collapse consecutive labels into segments
    #[arg(long, conflicts_with = "shares")]
    pub timeline: bool,

    /// Share of dates per label
    #[arg(long)]
    pub shares: bool,

    /// Combine slope, level and volatility into market regimes
    #[arg(long, conflicts_with = "timeline")]
    pub market: bool,

    /// Steep threshold on the slope (percentage points)
    #[arg(long, allow_hyphen_values = true)]
    pub high: Option<f64>,

    /// Inverted threshold on the slope (percentage points)
    #[arg(long, allow_hyphen_values = true)]
    pub low: Option<f64>,

    /// Humped threshold on the curvature (percentage points)
    #[arg(long)]
    pub curvature: Option<f64>,

    /// Short anchor (overrides the configuration)
    #[arg(long)]
    pub short: Option<String>,

    /// Mid anchor (overrides the configuration)
    #[arg(long)]
    pub mid: Option<String>,

    /// Long anchor (overrides the configuration)
    #[arg(long)]
    pub long: Option<String>,

    /// Low level quantile for --market
    #[arg(long, requires = "market")]
    pub level_low: Option<f64>,

    /// High level quantile for --market
    #[arg(long, requires = "market")]
    pub level_high: Option<f64>,

    /// High volatility quantile for --market
    #[arg(long, requires = "market")]
    pub vol_high: Option<f64>,

    /// Volatility maturity for --market (default: closest to 10Y)
    #[arg(long, requires = "market")]
    pub vol_maturity: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct RegimeRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Slope", display_with = "display_opt")]
    slope: Option<f64>,
    #[tabled(rename = "Curvature", display_with = "display_opt")]
    curvature: Option<f64>,
    #[tabled(rename = "Regime", display_with = "display_or_missing")]
    regime: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct SegmentRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Regime")]
    regime: String,
    #[tabled(rename = "Days")]
    observations: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    #[tabled(rename = "Regime")]
    regime: String,
    #[tabled(rename = "Days")]
    count: usize,
    #[tabled(rename = "Share (%)", display_with = "display_percent")]
    percent: f64,
}

#[derive(Debug, Serialize, Tabled)]
struct MarketRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Level", display_with = "display_opt")]
    level: Option<f64>,
    #[tabled(rename = "Slope", display_with = "display_opt")]
    slope: Option<f64>,
    #[tabled(rename = "Vol", display_with = "display_opt")]
    volatility: Option<f64>,
    #[tabled(rename = "Curve", display_with = "display_or_missing")]
    curve: Option<String>,
    #[tabled(rename = "Level Regime", display_with = "display_or_missing")]
    level_regime: Option<String>,
    #[tabled(rename = "Vol Regime", display_with = "display_or_missing")]
    vol_regime: Option<String>,
    #[tabled(rename = "Regime")]
    regime: String,
}

fn display_percent(value: &f64) -> String {
    format!("{value:.1}")
}

fn resolve_quantiles(args: &RegimesArgs, base: MarketRegimeQuantiles) -> MarketRegimeQuantiles {
    MarketRegimeQuantiles {
        level_low: args.level_low.unwrap_or(base.level_low),
        level_high: args.level_high.unwrap_or(base.level_high),
        vol_high: args.vol_high.unwrap_or(base.vol_high),
    }
}

fn resolve_thresholds(args: &RegimesArgs, base: RegimeThresholds) -> RegimeThresholds {
    RegimeThresholds {
        high: args.high.unwrap_or(base.high),
        low: args.low.unwrap_or(base.low),
        curvature: args.curvature.unwrap_or(base.curvature),
    }
}

/// Executes the regimes command.
pub fn execute(args: RegimesArgs, session: &Session) -> Result<()> {
    let analytics = &session.config.analytics;
    let thresholds = resolve_thresholds(&args, analytics.regimes);
    thresholds.validate()?;
    let anchors = anchors_with_overrides(
        &analytics.anchors,
        args.short.as_deref(),
        args.mid.as_deref(),
        args.long.as_deref(),
    )?;

    let table = session.load_table()?;
    let factors = FactorEngine::decompose(&table, &anchors)?;
    if args.market {
        return execute_market(&args, session, &table, &factors, &thresholds);
    }
    let regimes = RegimeEngine::classify(&factors, &thresholds)?;

    if args.shares {
        if session.decorated() {
            print_header("Regime shares");
        }
        let rows: Vec<ShareRow> = regimes
            .shares()
            .into_iter()
            .map(|s| ShareRow {
                regime: s.label.to_string(),
                count: s.count,
                percent: s.percent,
            })
            .collect();
        return print_output(&rows, session.format);
    }

    if args.timeline {
        let timeline = RegimeEngine::to_timeline(&regimes);
        if session.decorated() {
            print_header("Regime timeline");
        }
        let rows: Vec<SegmentRow> = timeline
            .segments
            .iter()
            .map(|s| SegmentRow {
                start: s.start.to_string(),
                end: s.end.to_string(),
                regime: s.label.to_string(),
                observations: s.observations,
            })
            .collect();
        print_output(&rows, session.format)?;
        if let (true, Some(current)) = (session.decorated(), timeline.current()) {
            print_info(&format!("Current regime: {} since {}", current.label, current.start));
        }
        return Ok(());
    }

    if session.decorated() {
        print_header(&format!(
            "Regimes (slope > {} steep, < {} inverted, curvature > {} humped)",
            thresholds.high, thresholds.low, thresholds.curvature
        ));
    }
    let rows: Vec<RegimeRow> = factors
        .points
        .iter()
        .zip(&regimes.points)
        .map(|(f, r)| RegimeRow {
            date: f.date.to_string(),
            slope: f.value.map(|v| v.slope),
            curvature: f.value.map(|v| v.curvature),
            regime: r.value.map(|l| l.to_string()),
        })
        .collect();
    print_output(&rows, session.format)
}

/// Market regimes from the factors and the reference volatility.
fn execute_market(
    args: &RegimesArgs,
    session: &Session,
    table: &CurveTable,
    factors: &FactorSeries,
    thresholds: &RegimeThresholds,
) -> Result<()> {
    let analytics = &session.config.analytics;
    let quantiles = resolve_quantiles(args, analytics.market_regimes);
    quantiles.validate()?;

    let maturity = match args.vol_maturity.as_deref() {
        Some(label) => parse_maturity(label)?,
        None => MarketRegimeEngine::reference_maturity(table.maturities())
            .ok_or_else(|| anyhow!("curve has no maturities"))?,
    };
    let vol = VolatilityEngine::rolling_vol_with(table, maturity, analytics.volatility)?;
    let market = MarketRegimeEngine::classify(factors, &vol, thresholds, &quantiles)?;
    tracing::debug!(%maturity, window = analytics.volatility.window, "classified market regimes");

    if args.shares {
        if session.decorated() {
            print_header("Market regime shares");
        }
        let rows: Vec<ShareRow> = market
            .shares()
            .into_iter()
            .map(|s| ShareRow {
                regime: s.regime.to_string(),
                count: s.count,
                percent: s.percent,
            })
            .collect();
        return print_output(&rows, session.format);
    }

    if session.decorated() {
        print_header(&format!(
            "Market regimes (level q{} / q{}, {} vol q{})",
            quantiles.level_low, quantiles.level_high, maturity, quantiles.vol_high
        ));
    }
    let rows: Vec<MarketRow> = market
        .points
        .iter()
        .map(|p| MarketRow {
            date: p.date.to_string(),
            level: p.level,
            slope: p.slope,
            volatility: p.volatility,
            curve: p.curve_regime.map(|l| l.to_string()),
            level_regime: p.level_regime.map(|l| l.to_string()),
            vol_regime: p.vol_regime.map(|l| l.to_string()),
            regime: p.regime.to_string(),
        })
        .collect();
    print_output(&rows, session.format)?;

    if let (true, Some(latest)) = (session.decorated(), market.latest()) {
        print_info(&format!("Latest market regime: {} on {}", latest.regime, latest.date));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_overrides() {
        let args = RegimesArgs {
            timeline: false,
            shares: false,
            market: false,
            high: Some(0.3),
            low: None,
            curvature: None,
            short: None,
            mid: None,
            long: None,
            level_low: None,
            level_high: None,
            vol_high: None,
            vol_maturity: None,
        };
        let t = resolve_thresholds(&args, RegimeThresholds::default());
        assert!((t.high - 0.3).abs() < f64::EPSILON);
        assert!((t.low + 0.10).abs() < f64::EPSILON);
        assert!((t.curvature - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quantile_overrides() {
        let args = RegimesArgs {
            timeline: false,
            shares: true,
            market: true,
            high: None,
            low: None,
            curvature: None,
            short: None,
            mid: None,
            long: None,
            level_low: Some(0.2),
            level_high: None,
            vol_high: Some(0.9),
            vol_maturity: None,
        };
        let q = resolve_quantiles(&args, MarketRegimeQuantiles::default());
        assert!((q.level_low - 0.2).abs() < f64::EPSILON);
        assert!((q.level_high - 0.67).abs() < f64::EPSILON);
        assert!((q.vol_high - 0.9).abs() < f64::EPSILON);
    }
}
