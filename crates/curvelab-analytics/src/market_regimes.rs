//! Composite market regimes from curve shape, rate level and volatility.
//!
//! Each date gets three component labels and one combined label:
//!
//! - curve: `steep` / `flat` / `inverted` from the slope band alone
//!   (`slope > high`, `slope < low`, otherwise flat; curvature is ignored)
//! - level: `low` when `level <= q(level_low)`, `high` when
//!   `level >= q(level_high)`, otherwise `mid`
//! - volatility: `high_vol` when `vol >= q(vol_high)`, otherwise `calm`
//!
//! Cut-offs are linearly interpolated quantiles over the defined values of
//! the whole input, so the labels are sample-relative and not point-in-time.
//!
//! The combined label takes the first matching rule:
//!
//! 1. `unknown` if any component is missing
//! 2. `risk_off`: inverted and high volatility
//! 3. `inversion`: inverted
//! 4. `reflation`: steep and low level
//! 5. `tight_policy`: flat and high level
//! 6. `volatile`: high volatility
//! 7. `normal`

use std::fmt;
use std::str::FromStr;

use curvelab_core::{Date, Maturity};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::factors::FactorSeries;
use crate::regimes::{RegimeLabel, RegimeThresholds};
use crate::series::point_at;
use crate::volatility::VolatilitySeries;

/// Maturity whose volatility drives the volatility component by default.
pub const REFERENCE_VOL_MATURITY: Maturity = Maturity::Y10;

/// Rate level relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelRegime {
    /// At or below the low quantile.
    Low,
    /// Between the two quantiles.
    Mid,
    /// At or above the high quantile.
    High,
}

impl LevelRegime {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

impl fmt::Display for LevelRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volatility relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolRegime {
    /// Below the high-volatility quantile.
    Calm,
    /// At or above the high-volatility quantile.
    HighVol,
}

impl VolRegime {
    /// Snake-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::HighVol => "high_vol",
        }
    }
}

impl fmt::Display for VolRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    /// Inverted curve with high volatility.
    RiskOff,
    /// Inverted curve.
    Inversion,
    /// Steep curve at a low rate level.
    Reflation,
    /// Flat curve at a high rate level.
    TightPolicy,
    /// High volatility without a more specific pattern.
    Volatile,
    /// None of the above.
    Normal,
    /// A component is missing.
    Unknown,
}

impl MarketRegime {
    /// Every regime, in precedence order.
    pub const ALL: [MarketRegime; 7] = [
        MarketRegime::RiskOff,
        MarketRegime::Inversion,
        MarketRegime::Reflation,
        MarketRegime::TightPolicy,
        MarketRegime::Volatile,
        MarketRegime::Normal,
        MarketRegime::Unknown,
    ];

    /// Snake-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskOff => "risk_off",
            Self::Inversion => "inversion",
            Self::Reflation => "reflation",
            Self::TightPolicy => "tight_policy",
            Self::Volatile => "volatile",
            Self::Normal => "normal",
            Self::Unknown => "unknown",
        }
    }

    /// Combines component labels; any missing component gives `Unknown`.
    #[must_use]
    pub fn combine(
        curve: Option<RegimeLabel>,
        level: Option<LevelRegime>,
        vol: Option<VolRegime>,
    ) -> Self {
        let (Some(curve), Some(level), Some(vol)) = (curve, level, vol) else {
            return Self::Unknown;
        };
        match (curve, level, vol) {
            (RegimeLabel::Inverted, _, VolRegime::HighVol) => Self::RiskOff,
            (RegimeLabel::Inverted, _, _) => Self::Inversion,
            (RegimeLabel::Steep, LevelRegime::Low, _) => Self::Reflation,
            (RegimeLabel::Flat, LevelRegime::High, _) => Self::TightPolicy,
            (_, _, VolRegime::HighVol) => Self::Volatile,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketRegime {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|regime| regime.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AnalyticsError::InvalidConfig(format!("unknown market regime '{s}'")))
    }
}

/// Quantiles locating the level and volatility cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketRegimeQuantiles {
    /// Level at or below this quantile is low.
    pub level_low: f64,
    /// Level at or above this quantile is high.
    pub level_high: f64,
    /// Volatility at or above this quantile is high.
    pub vol_high: f64,
}

impl MarketRegimeQuantiles {
    /// Creates and validates quantiles.
    ///
    /// # Errors
    ///
    /// See [`MarketRegimeQuantiles::validate`].
    pub fn new(level_low: f64, level_high: f64, vol_high: f64) -> AnalyticsResult<Self> {
        let quantiles = Self {
            level_low,
            level_high,
            vol_high,
        };
        quantiles.validate()?;
        Ok(quantiles)
    }

    /// Checks every quantile lies in `[0, 1]` and `level_low <= level_high`.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::InvalidQuantile` for a value outside `[0, 1]`
    /// - `AnalyticsError::InvalidConfig` if the level quantiles are reversed
    pub fn validate(&self) -> AnalyticsResult<()> {
        for (name, value) in [
            ("level_low", self.level_low),
            ("level_high", self.level_high),
            ("vol_high", self.vol_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalyticsError::InvalidQuantile {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if self.level_low > self.level_high {
            return Err(AnalyticsError::InvalidConfig(format!(
                "level_low quantile {} exceeds level_high {}",
                self.level_low, self.level_high
            )));
        }
        Ok(())
    }
}

impl Default for MarketRegimeQuantiles {
    fn default() -> Self {
        Self {
            level_low: 0.33,
            level_high: 0.67,
            vol_high: 0.67,
        }
    }
}

/// Cut-off values resolved from the quantiles; `None` without defined data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRegimeCutoffs {
    /// Low level cut-off, in percent.
    pub level_low: Option<f64>,
    /// High level cut-off, in percent.
    pub level_high: Option<f64>,
    /// High volatility cut-off, in the volatility series' units.
    pub vol_high: Option<f64>,
}

impl MarketRegimeCutoffs {
    fn level(&self, value: f64) -> Option<LevelRegime> {
        let (low, high) = (self.level_low?, self.level_high?);
        Some(if value <= low {
            LevelRegime::Low
        } else if value >= high {
            LevelRegime::High
        } else {
            LevelRegime::Mid
        })
    }

    fn vol(&self, value: f64) -> Option<VolRegime> {
        let high = self.vol_high?;
        Some(if value >= high {
            VolRegime::HighVol
        } else {
            VolRegime::Calm
        })
    }
}

/// Component and combined labels on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRegimePoint {
    /// Date.
    pub date: Date,
    /// Curve level, if defined.
    pub level: Option<f64>,
    /// Curve slope, if defined.
    pub slope: Option<f64>,
    /// Reference volatility, if defined.
    pub volatility: Option<f64>,
    /// Curve shape from the slope band.
    pub curve_regime: Option<RegimeLabel>,
    /// Level bucket.
    pub level_regime: Option<LevelRegime>,
    /// Volatility bucket.
    pub vol_regime: Option<VolRegime>,
    /// Combined label.
    pub regime: MarketRegime,
}

/// Combined regime count and share over all dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRegimeShare {
    /// Regime.
    pub regime: MarketRegime,
    /// Dates carrying the regime.
    pub count: usize,
    /// Share of all dates, in percent.
    pub percent: f64,
}

/// Per-date market regimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRegimeSeries {
    /// Maturity of the volatility input.
    pub vol_maturity: Maturity,
    /// Quantiles used.
    pub quantiles: MarketRegimeQuantiles,
    /// Resolved cut-offs.
    pub cutoffs: MarketRegimeCutoffs,
    /// One point per factor date.
    pub points: Vec<MarketRegimePoint>,
}

impl MarketRegimeSeries {
    /// Point on a date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&MarketRegimePoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.points[i])
    }

    /// Most recent point with a known regime.
    #[must_use]
    pub fn latest(&self) -> Option<&MarketRegimePoint> {
        self.points
            .iter()
            .rev()
            .find(|p| p.regime != MarketRegime::Unknown)
    }

    /// Count and percentage per regime, every regime listed, in precedence order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn shares(&self) -> Vec<MarketRegimeShare> {
        let total = self.points.len();
        MarketRegime::ALL
            .into_iter()
            .map(|regime| {
                let count = self.points.iter().filter(|p| p.regime == regime).count();
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                MarketRegimeShare {
                    regime,
                    count,
                    percent,
                }
            })
            .collect()
    }
}

/// Linearly interpolated quantile of unsorted values; `None` when empty.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Curve shape from the slope band alone.
fn slope_shape(slope: f64, thresholds: &RegimeThresholds) -> RegimeLabel {
    if slope > thresholds.high {
        RegimeLabel::Steep
    } else if slope < thresholds.low {
        RegimeLabel::Inverted
    } else {
        RegimeLabel::Flat
    }
}

/// Composite regime classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketRegimeEngine;

impl MarketRegimeEngine {
    /// Picks the schema maturity closest to [`REFERENCE_VOL_MATURITY`],
    /// preferring the shorter one on a tie.
    #[must_use]
    pub fn reference_maturity(maturities: &[Maturity]) -> Option<Maturity> {
        let target = i64::from(REFERENCE_VOL_MATURITY.months());
        maturities
            .iter()
            .copied()
            .min_by_key(|m| ((i64::from(m.months()) - target).abs(), m.months()))
    }

    /// Labels every factor date.
    ///
    /// Volatility is looked up by date; a factor date absent from `vol`
    /// has no volatility component. The volatility cut-off only uses
    /// values on factor dates.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::InvalidThresholds` for invalid slope thresholds
    /// - `AnalyticsError::InvalidQuantile` / `InvalidConfig` for invalid quantiles
    pub fn classify(
        factors: &FactorSeries,
        vol: &VolatilitySeries,
        thresholds: &RegimeThresholds,
        quantiles: &MarketRegimeQuantiles,
    ) -> AnalyticsResult<MarketRegimeSeries> {
        thresholds.validate()?;
        quantiles.validate()?;

        let aligned_vol: Vec<Option<f64>> = factors
            .points
            .iter()
            .map(|p| point_at(&vol.points, p.date).and_then(|v| v.value))
            .collect();

        let levels: Vec<f64> = factors
            .points
            .iter()
            .filter_map(|p| p.value.map(|f| f.level))
            .collect();
        let vols: Vec<f64> = aligned_vol.iter().flatten().copied().collect();

        let cutoffs = MarketRegimeCutoffs {
            level_low: quantile(&levels, quantiles.level_low),
            level_high: quantile(&levels, quantiles.level_high),
            vol_high: quantile(&vols, quantiles.vol_high),
        };

        let points: Vec<MarketRegimePoint> = factors
            .points
            .iter()
            .zip(aligned_vol)
            .map(|(p, volatility)| {
                let level = p.value.map(|f| f.level);
                let slope = p.value.map(|f| f.slope);
                let curve_regime = slope.map(|s| slope_shape(s, thresholds));
                let level_regime = level.and_then(|l| cutoffs.level(l));
                let vol_regime = volatility.and_then(|v| cutoffs.vol(v));
                MarketRegimePoint {
                    date: p.date,
                    level,
                    slope,
                    volatility,
                    curve_regime,
                    level_regime,
                    vol_regime,
                    regime: MarketRegime::combine(curve_regime, level_regime, vol_regime),
                }
            })
            .collect();

        log::debug!(
            "market regimes over {} dates ({} vol): {} unknown",
            points.len(),
            vol.maturity,
            points
                .iter()
                .filter(|p| p.regime == MarketRegime::Unknown)
                .count()
        );

        Ok(MarketRegimeSeries {
            vol_maturity: vol.maturity,
            quantiles: *quantiles,
            cutoffs,
            points,
        })
    }
}
