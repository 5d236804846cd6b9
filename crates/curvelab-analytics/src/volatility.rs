//! Rolling realized volatility of daily yield changes.
//!
//! A change exists at row `i` only when both row `i` and row `i - 1` carry a
//! yield; gaps are skipped, never treated as zero. The window counts valid
//! changes, not calendar days. A value is emitted on a date that carries a
//! valid change once at least `window` valid changes have accumulated, as
//! the sample (N-1) standard deviation of the last `window` changes.
//!
//! Values only depend on rows at or before their date.

use std::collections::VecDeque;

use curvelab_core::{CurveTable, Date, Maturity};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{latest_defined, SeriesPoint};

/// Default window, about one trading month.
pub const DEFAULT_WINDOW: usize = 21;

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Scale factor converting percentage points to basis points.
pub const BASIS_POINTS: f64 = 100.0;

/// Window and units of a volatility computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySpec {
    /// Number of valid changes per window (at least 2).
    pub window: usize,
    /// Multiplier applied to each change.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Periods per year to annualize by, if any.
    #[serde(default)]
    pub annualization: Option<u32>,
}

fn default_scale() -> f64 {
    1.0
}

impl VolatilitySpec {
    /// Unscaled, unannualized volatility over `window` changes.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            scale: 1.0,
            annualization: None,
        }
    }

    /// Reports volatility in basis points.
    #[must_use]
    pub fn in_basis_points(mut self) -> Self {
        self.scale = BASIS_POINTS;
        self
    }

    /// Annualizes by `sqrt(periods_per_year)`.
    #[must_use]
    pub fn annualized(mut self, periods_per_year: u32) -> Self {
        self.annualization = Some(periods_per_year);
        self
    }

    /// Checks the window and scale.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::InvalidWindow` if `window < 2`
    /// - `AnalyticsError::InvalidConfig` for a non-positive scale or zero
    ///   annualization
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.window < 2 {
            return Err(AnalyticsError::InvalidWindow {
                window: self.window,
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "volatility scale must be positive, got {}",
                self.scale
            )));
        }
        if self.annualization == Some(0) {
            return Err(AnalyticsError::InvalidConfig(
                "annualization periods must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn factor(&self) -> f64 {
        let annual = self
            .annualization
            .map_or(1.0, |periods| f64::from(periods).sqrt());
        self.scale * annual
    }
}

impl Default for VolatilitySpec {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Rolling volatility of one maturity, aligned with the table's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySeries {
    /// Maturity the changes were taken from.
    pub maturity: Maturity,
    /// Window and units.
    pub spec: VolatilitySpec,
    /// One point per table date.
    pub points: Vec<SeriesPoint>,
}

impl VolatilitySeries {
    /// Returns the most recent defined value.
    #[must_use]
    pub fn latest(&self) -> Option<(Date, f64)> {
        latest_defined(&self.points)
    }
}

/// Rolling volatility calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityEngine;

impl VolatilityEngine {
    /// Rolling sample standard deviation of raw changes, in percentage points.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::InvalidWindow` if `window < 2`
    /// - `AnalyticsError::UnknownMaturity` if `maturity` is absent from the schema
    pub fn rolling_vol(
        table: &CurveTable,
        maturity: Maturity,
        window: usize,
    ) -> AnalyticsResult<VolatilitySeries> {
        Self::rolling_vol_with(table, maturity, VolatilitySpec::new(window))
    }

    /// Rolling volatility with explicit units.
    ///
    /// # Errors
    ///
    /// See [`VolatilitySpec::validate`]; also `AnalyticsError::UnknownMaturity`.
    pub fn rolling_vol_with(
        table: &CurveTable,
        maturity: Maturity,
        spec: VolatilitySpec,
    ) -> AnalyticsResult<VolatilitySeries> {
        spec.validate()?;
        let column = table.column(maturity)?;

        let factor = spec.factor();
        let mut window: VecDeque<f64> = VecDeque::with_capacity(spec.window);
        let mut points = Vec::with_capacity(column.len());

        for (i, date) in table.dates().iter().enumerate() {
            let change = match (i.checked_sub(1).and_then(|p| column[p]), column[i]) {
                (Some(prev), Some(curr)) => Some(curr - prev),
                _ => None,
            };

            let value = change.and_then(|c| {
                if window.len() == spec.window {
                    window.pop_front();
                }
                window.push_back(c);
                (window.len() == spec.window).then(|| sample_std(&window) * factor)
            });
            points.push(SeriesPoint::new(*date, value));
        }

        log::debug!(
            "rolling vol for {} (window {}): {} defined of {}",
            maturity,
            spec.window,
            points.iter().filter(|p| p.is_defined()).count(),
            points.len()
        );

        Ok(VolatilitySeries {
            maturity,
            spec,
            points,
        })
    }

    /// Rolling volatility for every maturity in the schema, in schema order.
    ///
    /// # Errors
    ///
    /// See [`VolatilitySpec::validate`].
    pub fn rolling_vol_all(
        table: &CurveTable,
        spec: VolatilitySpec,
    ) -> AnalyticsResult<Vec<VolatilitySeries>> {
        spec.validate()?;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            table
                .maturities()
                .par_iter()
                .map(|m| Self::rolling_vol_with(table, *m, spec))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            table
                .maturities()
                .iter()
                .map(|m| Self::rolling_vol_with(table, *m, spec))
                .collect()
        }
    }
}

/// Sample standard deviation (N-1). Requires at least two values.
#[allow(clippy::cast_precision_loss)]
fn sample_std(values: &VecDeque<f64>) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}
