//! Curve-shape regime classification.
//!
//! Each date's `(slope, curvature)` is mapped to one of four labels:
//!
//! - `steep`: `slope > high`
//! - `inverted`: `slope < low`
//! - `humped`: `abs(slope) <= high` and `abs(curvature) > curvature`
//! - `flat`: otherwise
//!
//! All comparisons are strict, so a value exactly on a threshold falls to
//! the lower-magnitude label. Classification is a pure per-date map; the
//! timeline is a run-length encoding of the labelled dates.

use std::fmt;
use std::str::FromStr;

use curvelab_core::Date;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::factors::{FactorSeries, Factors};
use crate::series::{latest_defined, point_at, SeriesPoint};

/// Discrete curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeLabel {
    /// Slope above the high threshold.
    Steep,
    /// Slope within thresholds, no pronounced hump.
    Flat,
    /// Slope below the low threshold.
    Inverted,
    /// Slope within the high threshold with large curvature of either sign.
    Humped,
}

impl RegimeLabel {
    /// Every label, in display order.
    pub const ALL: [RegimeLabel; 4] = [
        RegimeLabel::Steep,
        RegimeLabel::Flat,
        RegimeLabel::Inverted,
        RegimeLabel::Humped,
    ];

    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Steep => "steep",
            Self::Flat => "flat",
            Self::Inverted => "inverted",
            Self::Humped => "humped",
        }
    }
}

impl fmt::Display for RegimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegimeLabel {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AnalyticsError::InvalidConfig(format!("unknown regime label '{s}'")))
    }
}

/// Slope and curvature thresholds, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeThresholds {
    /// Slope above this is steep.
    pub high: f64,
    /// Slope below this is inverted.
    pub low: f64,
    /// Curvature magnitude above this is humped.
    pub curvature: f64,
}

impl RegimeThresholds {
    /// Creates and validates thresholds.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidThresholds` if the values are invalid.
    pub fn new(high: f64, low: f64, curvature: f64) -> AnalyticsResult<Self> {
        let thresholds = Self {
            high,
            low,
            curvature,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Checks `low < 0 <= high`, `curvature >= 0` and finiteness.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidThresholds` describing the first violation.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.high.is_finite() && self.low.is_finite() && self.curvature.is_finite()) {
            return Err(AnalyticsError::invalid_thresholds("thresholds must be finite"));
        }
        if self.low >= 0.0 {
            return Err(AnalyticsError::invalid_thresholds(format!(
                "low threshold must be negative, got {}",
                self.low
            )));
        }
        if self.high < 0.0 {
            return Err(AnalyticsError::invalid_thresholds(format!(
                "high threshold must be non-negative, got {}",
                self.high
            )));
        }
        if self.curvature < 0.0 {
            return Err(AnalyticsError::invalid_thresholds(format!(
                "curvature threshold must be non-negative, got {}",
                self.curvature
            )));
        }
        Ok(())
    }
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            high: 0.10,
            low: -0.10,
            curvature: 0.25,
        }
    }
}

/// Classifies one `(slope, curvature)` pair.
#[must_use]
pub fn classify_point(slope: f64, curvature: f64, thresholds: &RegimeThresholds) -> RegimeLabel {
    if slope > thresholds.high {
        RegimeLabel::Steep
    } else if slope < thresholds.low {
        RegimeLabel::Inverted
    } else if slope.abs() <= thresholds.high && curvature.abs() > thresholds.curvature {
        RegimeLabel::Humped
    } else {
        RegimeLabel::Flat
    }
}

/// Label count and share over the defined dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeShare {
    /// Label.
    pub label: RegimeLabel,
    /// Dates carrying the label.
    pub count: usize,
    /// Share of defined dates, in percent.
    pub percent: f64,
}

/// Per-date regime labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSeries {
    /// Thresholds used.
    pub thresholds: RegimeThresholds,
    /// One point per factor date; `None` where the factors were missing.
    pub points: Vec<SeriesPoint<RegimeLabel>>,
}

impl RegimeSeries {
    /// Label on a date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<RegimeLabel> {
        point_at(&self.points, date).and_then(|p| p.value)
    }

    /// Most recent defined label.
    #[must_use]
    pub fn latest(&self) -> Option<(Date, RegimeLabel)> {
        latest_defined(&self.points)
    }

    /// Count and percentage per label, every label listed, in display order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn shares(&self) -> Vec<RegimeShare> {
        let defined = self.points.iter().filter(|p| p.is_defined()).count();
        RegimeLabel::ALL
            .into_iter()
            .map(|label| {
                let count = self
                    .points
                    .iter()
                    .filter(|p| p.value == Some(label))
                    .count();
                let percent = if defined == 0 {
                    0.0
                } else {
                    count as f64 / defined as f64 * 100.0
                };
                RegimeShare {
                    label,
                    count,
                    percent,
                }
            })
            .collect()
    }
}

/// A run of consecutive dates with the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSegment {
    /// First date of the run.
    pub start: Date,
    /// Last date of the run (inclusive).
    pub end: Date,
    /// Label of the run.
    pub label: RegimeLabel,
    /// Dates in the run.
    pub observations: usize,
}

/// Run-length encoded regime labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTimeline {
    /// Segments in date order.
    pub segments: Vec<RegimeSegment>,
}

impl RegimeTimeline {
    /// Replicates each segment's label over the given dates.
    ///
    /// Dates outside every segment come back undefined.
    #[must_use]
    pub fn expand(&self, dates: &[Date]) -> Vec<SeriesPoint<RegimeLabel>> {
        let mut segments = self.segments.iter().peekable();
        dates
            .iter()
            .map(|&date| {
                while segments.peek().is_some_and(|s| s.end < date) {
                    segments.next();
                }
                let label = segments
                    .peek()
                    .filter(|s| s.start <= date)
                    .map(|s| s.label);
                SeriesPoint::new(date, label)
            })
            .collect()
    }

    /// Segment containing the last labelled date.
    #[must_use]
    pub fn current(&self) -> Option<&RegimeSegment> {
        self.segments.last()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if no date is labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Regime classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegimeEngine;

impl RegimeEngine {
    /// Labels every date of a factor series.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidThresholds` if the thresholds are invalid.
    pub fn classify(
        factors: &FactorSeries,
        thresholds: &RegimeThresholds,
    ) -> AnalyticsResult<RegimeSeries> {
        thresholds.validate()?;

        let points = factors
            .points
            .iter()
            .map(|p| {
                let label = p
                    .value
                    .map(|Factors { slope, curvature, .. }| classify_point(slope, curvature, thresholds));
                SeriesPoint::new(p.date, label)
            })
            .collect();

        Ok(RegimeSeries {
            thresholds: *thresholds,
            points,
        })
    }

    /// Merges consecutive equal labels. An undefined date ends the open run.
    #[must_use]
    pub fn to_timeline(series: &RegimeSeries) -> RegimeTimeline {
        let mut segments: Vec<RegimeSegment> = Vec::new();
        let mut open = false;

        for point in &series.points {
            let Some(label) = point.value else {
                open = false;
                continue;
            };
            match segments.last_mut() {
                Some(last) if open && last.label == label => {
                    last.end = point.date;
                    last.observations += 1;
                }
                _ => {
                    segments.push(RegimeSegment {
                        start: point.date,
                        end: point.date,
                        label,
                        observations: 1,
                    });
                    open = true;
                }
            }
        }

        log::debug!(
            "regime timeline: {} segments over {} dates",
            segments.len(),
            series.points.len()
        );
        RegimeTimeline { segments }
    }
}
