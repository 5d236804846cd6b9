//! Level, slope and curvature decomposition.
//!
//! Each date's curve is reduced to three scalars read from fixed anchor
//! maturities:
//!
//! - level: the long anchor's yield, or the mean over a fixed maturity set
//! - slope: `long - short`
//! - curvature: `2 * mid - short - long` (sign configurable)
//!
//! The computation is strictly per date. Decomposing any slice of a table
//! gives the same values for the dates it contains.

use std::fmt;
use std::str::FromStr;

use curvelab_core::{CurveTable, Date, Maturity};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{point_at, SeriesPoint};

/// How the level factor is defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelDefinition {
    /// Level is the long anchor's yield.
    #[default]
    LongAnchor,
    /// Level is the arithmetic mean of these maturities.
    Average {
        /// Maturities averaged; all must be in the schema.
        maturities: Vec<Maturity>,
    },
}

/// Sign convention for curvature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvatureSign {
    /// `2 * mid - short - long`: positive when the belly sits above the wings.
    #[default]
    MidOverWings,
    /// `short + long - 2 * mid`.
    WingsOverMid,
}

impl CurvatureSign {
    fn apply(self, butterfly: f64) -> f64 {
        match self {
            Self::MidOverWings => butterfly,
            Self::WingsOverMid => -butterfly,
        }
    }
}

/// Anchor maturities fixed for a whole decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAnchors {
    /// Short anchor.
    pub short: Maturity,
    /// Mid anchor.
    pub mid: Maturity,
    /// Long anchor.
    pub long: Maturity,
    /// Level definition.
    #[serde(default)]
    pub level: LevelDefinition,
    /// Curvature sign convention.
    #[serde(default)]
    pub curvature_sign: CurvatureSign,
}

impl FactorAnchors {
    /// Creates anchors with level at the long anchor.
    #[must_use]
    pub fn new(short: Maturity, mid: Maturity, long: Maturity) -> Self {
        Self {
            short,
            mid,
            long,
            level: LevelDefinition::LongAnchor,
            curvature_sign: CurvatureSign::MidOverWings,
        }
    }

    /// Sets the level definition.
    #[must_use]
    pub fn with_level(mut self, level: LevelDefinition) -> Self {
        self.level = level;
        self
    }

    /// Sets the curvature sign convention.
    #[must_use]
    pub fn with_curvature_sign(mut self, sign: CurvatureSign) -> Self {
        self.curvature_sign = sign;
        self
    }

    /// Every maturity the decomposition reads, anchors first.
    #[must_use]
    pub fn required_maturities(&self) -> Vec<Maturity> {
        let mut required = vec![self.short, self.mid, self.long];
        if let LevelDefinition::Average { maturities } = &self.level {
            for m in maturities {
                if !required.contains(m) {
                    required.push(*m);
                }
            }
        }
        required
    }
}

impl Default for FactorAnchors {
    fn default() -> Self {
        Self::new(Maturity::Y2, Maturity::Y5, Maturity::Y10)
    }
}

/// One date's factor triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factors {
    /// Level, in percent.
    pub level: f64,
    /// Slope, in percentage points.
    pub slope: f64,
    /// Curvature, in percentage points.
    pub curvature: f64,
}

impl Factors {
    /// Returns one component.
    #[must_use]
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Level => self.level,
            Factor::Slope => self.slope,
            Factor::Curvature => self.curvature,
        }
    }
}

/// Factor selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    /// Level.
    Level,
    /// Slope.
    Slope,
    /// Curvature.
    Curvature,
}

impl Factor {
    /// All factors in display order.
    pub const ALL: [Factor; 3] = [Factor::Level, Factor::Slope, Factor::Curvature];
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Level => "level",
            Self::Slope => "slope",
            Self::Curvature => "curvature",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Factor {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level" => Ok(Self::Level),
            "slope" => Ok(Self::Slope),
            "curvature" => Ok(Self::Curvature),
            other => Err(AnalyticsError::InvalidConfig(format!(
                "unknown factor '{other}' (expected level, slope or curvature)"
            ))),
        }
    }
}

/// Factor triples aligned with the source table's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSeries {
    /// Anchors used for the decomposition.
    pub anchors: FactorAnchors,
    /// One point per table date; `None` when any input was missing.
    pub points: Vec<SeriesPoint<Factors>>,
}

impl FactorSeries {
    /// Returns the triple on a date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<Factors> {
        point_at(&self.points, date).and_then(|p| p.value)
    }

    /// Extracts a single factor as a plain series.
    #[must_use]
    pub fn component(&self, factor: Factor) -> Vec<SeriesPoint> {
        self.points
            .iter()
            .map(|p| SeriesPoint::new(p.date, p.value.map(|f| f.get(factor))))
            .collect()
    }

    /// Dates of the series.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.points.iter().map(|p| p.date)
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

/// Fixed-anchor factor decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorEngine;

impl FactorEngine {
    /// Decomposes every date of `table`.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::UnknownMaturity` if an anchor or level maturity is
    ///   absent from the schema
    /// - `AnalyticsError::InvalidConfig` if an averaged level has no maturities
    pub fn decompose(table: &CurveTable, anchors: &FactorAnchors) -> AnalyticsResult<FactorSeries> {
        let short = table.column(anchors.short)?;
        let mid = table.column(anchors.mid)?;
        let long = table.column(anchors.long)?;

        let level_columns = match &anchors.level {
            LevelDefinition::LongAnchor => vec![long],
            LevelDefinition::Average { maturities } => {
                if maturities.is_empty() {
                    return Err(AnalyticsError::InvalidConfig(
                        "averaged level needs at least one maturity".to_string(),
                    ));
                }
                maturities
                    .iter()
                    .map(|m| table.column(*m))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let points = table
            .dates()
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let value = triple_at(
                    short[i],
                    mid[i],
                    long[i],
                    mean(level_columns.iter().map(|c| c[i])),
                    anchors.curvature_sign,
                );
                SeriesPoint::new(*date, value)
            })
            .collect();

        log::debug!(
            "decomposed {} dates with anchors {}/{}/{}",
            table.len(),
            anchors.short,
            anchors.mid,
            anchors.long
        );

        Ok(FactorSeries {
            anchors: anchors.clone(),
            points,
        })
    }
}

fn triple_at(
    short: Option<f64>,
    mid: Option<f64>,
    long: Option<f64>,
    level: Option<f64>,
    sign: CurvatureSign,
) -> Option<Factors> {
    let (s, m, l) = (short?, mid?, long?);
    Some(Factors {
        level: level?,
        slope: l - s,
        curvature: sign.apply(2.0 * m - s - l),
    })
}

/// Mean of the values, `None` if any is missing.
#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v?;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curvelab_core::RawRow;

    fn date(d: u32) -> Date {
        Date::from_ymd(2025, 6, d).unwrap()
    }

    fn row(d: u32, y2: Option<f64>, y5: Option<f64>, y10: Option<f64>, y30: Option<f64>) -> RawRow {
        RawRow::new(date(d))
            .with("2y", y2)
            .with("5y", y5)
            .with("10y", y10)
            .with("30y", y30)
    }

    fn table() -> CurveTable {
        CurveTable::load(vec![
            row(2, Some(4.0), Some(4.5), Some(4.6), Some(4.9)),
            row(3, Some(4.1), None, Some(4.7), Some(5.0)),
            row(4, Some(4.2), Some(4.4), Some(4.3), Some(4.5)),
        ])
        .unwrap()
    }

    #[test]
    fn test_decompose_defaults() {
        let series = FactorEngine::decompose(&table(), &FactorAnchors::default()).unwrap();
        assert_eq!(series.len(), 3);

        let f = series.get(date(2)).unwrap();
        assert_relative_eq!(f.level, 4.6, epsilon = 1e-12);
        assert_relative_eq!(f.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(f.curvature, 0.4, epsilon = 1e-12);

        let f = series.get(date(4)).unwrap();
        assert_relative_eq!(f.slope, 0.1, epsilon = 1e-12);
        assert_relative_eq!(f.curvature, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_anchor_blanks_whole_triple() {
        let series = FactorEngine::decompose(&table(), &FactorAnchors::default()).unwrap();
        assert_eq!(series.get(date(3)), None);
        assert!(series.get(date(2)).is_some());
        assert!(series.get(date(4)).is_some());
    }

    #[test]
    fn test_absent_anchor_is_an_error() {
        let anchors = FactorAnchors::new(Maturity::M3, Maturity::Y5, Maturity::Y10);
        let err = FactorEngine::decompose(&table(), &anchors).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::UnknownMaturity {
                maturity: Maturity::M3
            }
        );
    }

    #[test]
    fn test_average_level_and_sign() {
        let anchors = FactorAnchors::default()
            .with_level(LevelDefinition::Average {
                maturities: vec![Maturity::Y2, Maturity::Y10, Maturity::Y30],
            })
            .with_curvature_sign(CurvatureSign::WingsOverMid);

        let series = FactorEngine::decompose(&table(), &anchors).unwrap();
        let f = series.get(date(2)).unwrap();
        assert_relative_eq!(f.level, 4.5, epsilon = 1e-12);
        assert_relative_eq!(f.curvature, -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_average_is_rejected() {
        let anchors = FactorAnchors::default().with_level(LevelDefinition::Average {
            maturities: Vec::new(),
        });
        assert!(matches!(
            FactorEngine::decompose(&table(), &anchors),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_component_extraction() {
        let series = FactorEngine::decompose(&table(), &FactorAnchors::default()).unwrap();
        let slope = series.component(Factor::Slope);
        assert_eq!(slope.len(), 3);
        assert_eq!(slope[1].value, None);
        assert_relative_eq!(slope[2].value.unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_factor_parse_and_display() {
        for factor in Factor::ALL {
            assert_eq!(factor.to_string().parse::<Factor>().unwrap(), factor);
        }
        assert_eq!(" Slope ".parse::<Factor>().unwrap(), Factor::Slope);
        assert!("twist".parse::<Factor>().is_err());
    }

    #[test]
    fn test_anchors_serde() {
        let anchors = FactorAnchors::default().with_level(LevelDefinition::Average {
            maturities: vec![Maturity::Y2, Maturity::Y10],
        });
        let json = serde_json::to_string(&anchors).unwrap();
        assert!(json.contains("\"kind\":\"average\""));
        let back: FactorAnchors = serde_json::from_str(&json).unwrap();
        assert_eq!(back, anchors);
        assert_eq!(
            anchors.required_maturities(),
            vec![Maturity::Y2, Maturity::Y5, Maturity::Y10]
        );
    }
}
