//! Maturity spreads.
//!
//! A spread is `yield(long_leg) - yield(short_leg)` on the same date, in
//! percentage points. Named spreads come from a closed [`SpreadRegistry`];
//! arbitrary pairs go through [`custom_spread`]. Each date is computed
//! independently, so a missing leg only blanks that one date.

use std::fmt;

use curvelab_core::{CurveTable, Date, Maturity};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{latest_defined, point_at, SeriesPoint};

/// A named `(short_leg, long_leg)` maturity pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpreadPair {
    /// Display and lookup name, e.g. `10Y-2Y`.
    pub name: String,
    /// Maturity subtracted.
    pub short_leg: Maturity,
    /// Maturity subtracted from.
    pub long_leg: Maturity,
}

impl SpreadPair {
    /// Creates a named pair.
    #[must_use]
    pub fn new(name: impl Into<String>, short_leg: Maturity, long_leg: Maturity) -> Self {
        Self {
            name: name.into(),
            short_leg,
            long_leg,
        }
    }

    /// Creates a pair named after its legs, `LONG-SHORT`.
    #[must_use]
    pub fn from_legs(short_leg: Maturity, long_leg: Maturity) -> Self {
        Self::new(format!("{long_leg}-{short_leg}"), short_leg, long_leg)
    }
}

impl fmt::Display for SpreadPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The closed set of pairs available by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRegistry {
    pairs: Vec<SpreadPair>,
}

impl SpreadRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// The standard Treasury curve spreads.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_pairs([
            SpreadPair::from_legs(Maturity::Y2, Maturity::Y10),
            SpreadPair::from_legs(Maturity::Y10, Maturity::Y30),
            SpreadPair::from_legs(Maturity::Y2, Maturity::Y5),
            SpreadPair::from_legs(Maturity::Y5, Maturity::Y30),
            SpreadPair::from_legs(Maturity::M3, Maturity::Y5),
            SpreadPair::from_legs(Maturity::M3, Maturity::Y10),
        ])
    }

    /// Builds a registry from pairs. A later pair replaces an earlier one
    /// with the same name.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = SpreadPair>) -> Self {
        pairs
            .into_iter()
            .fold(Self::empty(), |registry, pair| registry.with_pair(pair))
    }

    /// Registers a pair, replacing any pair with the same name.
    #[must_use]
    pub fn with_pair(mut self, pair: SpreadPair) -> Self {
        match self.position(&pair.name) {
            Some(i) => self.pairs[i] = pair,
            None => self.pairs.push(pair),
        }
        self
    }

    /// Looks up a pair by name (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownPair` if the name is not registered.
    pub fn get(&self, name: &str) -> AnalyticsResult<&SpreadPair> {
        self.position(name)
            .map(|i| &self.pairs[i])
            .ok_or_else(|| AnalyticsError::UnknownPair {
                name: name.to_string(),
                registered: self.names().join(", "),
            })
    }

    /// Registered pairs in registration order.
    #[must_use]
    pub fn pairs(&self) -> &[SpreadPair] {
        &self.pairs
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.name.as_str()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.pairs
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl Default for SpreadRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// A spread time series aligned with the source table's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSeries {
    /// The pair the spread was computed for.
    pub pair: SpreadPair,
    /// One point per table date, in percentage points.
    pub points: Vec<SeriesPoint>,
}

impl SpreadSeries {
    /// Returns the spread on a date, `None` if missing or not in the series.
    #[must_use]
    pub fn value_at(&self, date: Date) -> Option<f64> {
        point_at(&self.points, date).and_then(|p| p.value)
    }

    /// Returns the most recent defined spread.
    #[must_use]
    pub fn latest(&self) -> Option<(Date, f64)> {
        latest_defined(&self.points)
    }

    /// Iterates over the defined `(date, spread)` values.
    pub fn defined(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Computes named and custom spreads against a registry.
#[derive(Debug, Clone, Default)]
pub struct SpreadEngine {
    registry: SpreadRegistry,
}

impl SpreadEngine {
    /// Creates an engine over a registry.
    #[must_use]
    pub fn new(registry: SpreadRegistry) -> Self {
        Self { registry }
    }

    /// Creates an engine over the standard registry.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(SpreadRegistry::standard())
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &SpreadRegistry {
        &self.registry
    }

    /// Computes a registered spread.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::UnknownPair` if the name is not registered
    /// - `AnalyticsError::UnknownMaturity` if a leg is absent from the schema
    pub fn named_spread(&self, table: &CurveTable, pair_name: &str) -> AnalyticsResult<SpreadSeries> {
        let pair = self.registry.get(pair_name)?;
        spread_for_pair(table, pair.clone())
    }

    /// Computes a spread for any two maturities in the schema.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownMaturity` if a leg is absent from the schema.
    pub fn custom_spread(
        &self,
        table: &CurveTable,
        short_leg: Maturity,
        long_leg: Maturity,
    ) -> AnalyticsResult<SpreadSeries> {
        custom_spread(table, short_leg, long_leg)
    }

    /// Computes every registered spread, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first `AnalyticsError::UnknownMaturity` if any registered
    /// leg is absent from the schema.
    #[cfg(feature = "parallel")]
    pub fn all_named(&self, table: &CurveTable) -> AnalyticsResult<Vec<SpreadSeries>> {
        use rayon::prelude::*;

        self.registry
            .pairs()
            .par_iter()
            .map(|pair| spread_for_pair(table, pair.clone()))
            .collect()
    }

    /// Computes every registered spread, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first `AnalyticsError::UnknownMaturity` if any registered
    /// leg is absent from the schema.
    #[cfg(not(feature = "parallel"))]
    pub fn all_named(&self, table: &CurveTable) -> AnalyticsResult<Vec<SpreadSeries>> {
        self.registry
            .pairs()
            .iter()
            .map(|pair| spread_for_pair(table, pair.clone()))
            .collect()
    }
}

/// Computes `yield(long_leg) - yield(short_leg)` for every table date.
///
/// # Errors
///
/// Returns `AnalyticsError::UnknownMaturity` if a leg is absent from the schema.
pub fn custom_spread(
    table: &CurveTable,
    short_leg: Maturity,
    long_leg: Maturity,
) -> AnalyticsResult<SpreadSeries> {
    spread_for_pair(table, SpreadPair::from_legs(short_leg, long_leg))
}

fn spread_for_pair(table: &CurveTable, pair: SpreadPair) -> AnalyticsResult<SpreadSeries> {
    let short = table.column(pair.short_leg)?;
    let long = table.column(pair.long_leg)?;

    let points = table
        .dates()
        .iter()
        .zip(short.iter().zip(long))
        .map(|(date, (s, l))| {
            let value = match (s, l) {
                (Some(s), Some(l)) => Some(l - s),
                _ => None,
            };
            SeriesPoint::new(*date, value)
        })
        .collect();

    log::debug!("computed spread {} over {} dates", pair.name, table.len());
    Ok(SpreadSeries { pair, points })
}
