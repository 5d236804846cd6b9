//! Macro series alignment.
//!
//! Macro observations (usually monthly or weekly) are carried onto the
//! daily curve index with an as-of join: each curve date takes the latest
//! macro observation dated on or before it. A missing or empty macro source
//! never fails; the overlay simply comes back unavailable everywhere.

use curvelab_core::Date;
use serde::{Deserialize, Serialize};

use crate::factors::FactorSeries;
use crate::regimes::{RegimeLabel, RegimeSeries};

/// Default flag threshold of a 0/1 recession indicator.
pub const RECESSION_THRESHOLD: f64 = 0.5;

/// Flagged observations further apart than this start a new interval.
pub const RECESSION_MAX_GAP_DAYS: i64 = 40;

/// One macro observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroObservation {
    /// Observation date.
    pub date: Date,
    /// Observed value.
    pub value: f64,
}

impl MacroObservation {
    /// Creates an observation.
    #[must_use]
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// An external macro series with ascending, unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    /// Series identifier, e.g. `DFF`.
    pub id: String,
    /// Human-readable name.
    pub label: Option<String>,
    observations: Vec<MacroObservation>,
}

impl MacroSeries {
    /// Builds a series, sorting by date. On duplicate dates the last
    /// observation wins; non-finite values are dropped.
    pub fn new(id: impl Into<String>, observations: impl IntoIterator<Item = MacroObservation>) -> Self {
        let id = id.into();
        let mut observations: Vec<_> = observations.into_iter().collect();
        let raw = observations.len();
        observations.retain(|o| o.value.is_finite());

        // stable sort keeps input order among equal dates
        observations.sort_by_key(|o| o.date);
        let mut deduped: Vec<MacroObservation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }

        if deduped.len() != raw {
            log::debug!(
                "macro series {}: kept {} of {} observations",
                id,
                deduped.len(),
                raw
            );
        }

        Self {
            id,
            label: None,
            observations: deduped,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Observations in date order.
    #[must_use]
    pub fn observations(&self) -> &[MacroObservation] {
        &self.observations
    }

    /// Latest observation dated on or before `date`.
    #[must_use]
    pub fn latest_at(&self, date: Date) -> Option<&MacroObservation> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        idx.checked_sub(1).map(|i| &self.observations[i])
    }

    /// Observations within `[start, end]`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> &[MacroObservation] {
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = self.observations.partition_point(|o| o.date <= end);
        if lo >= hi {
            &[]
        } else {
            &self.observations[lo..hi]
        }
    }

    /// Display name: the label if set, else the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Whether an overlay point found a macro observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Value carried from an observation on or before the curve date.
    Joined,
    /// No observation at or before the curve date.
    Unavailable,
}

/// One curve date of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    /// Curve date.
    pub date: Date,
    /// Carried macro value.
    pub value: Option<f64>,
    /// Date of the macro observation the value came from.
    pub source_date: Option<Date>,
    /// Join outcome.
    pub provenance: Provenance,
}

/// A macro series aligned to curve dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroOverlay {
    /// Series identifier, `None` when no source was supplied.
    pub series_id: Option<String>,
    /// One point per curve date.
    pub points: Vec<OverlayPoint>,
}

impl MacroOverlay {
    /// Number of joined points.
    #[must_use]
    pub fn joined_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.provenance == Provenance::Joined)
            .count()
    }

    /// Returns true if no curve date received a value.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.joined_count() == 0
    }
}

/// As-of join of macro series onto curve dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroJoin;

impl MacroJoin {
    /// Aligns `series` onto `curve_dates` (ascending).
    ///
    /// With no series every point is unavailable.
    #[must_use]
    pub fn align(curve_dates: &[Date], series: Option<&MacroSeries>) -> MacroOverlay {
        let Some(series) = series else {
            log::debug!("no macro source, overlay unavailable");
            return MacroOverlay {
                series_id: None,
                points: curve_dates.iter().map(|d| unavailable(*d)).collect(),
            };
        };

        let points = curve_dates
            .iter()
            .map(|&date| match series.latest_at(date) {
                Some(obs) => OverlayPoint {
                    date,
                    value: Some(obs.value),
                    source_date: Some(obs.date),
                    provenance: Provenance::Joined,
                },
                None => unavailable(date),
            })
            .collect();

        MacroOverlay {
            series_id: Some(series.id.clone()),
            points,
        }
    }
}

fn unavailable(date: Date) -> OverlayPoint {
    OverlayPoint {
        date,
        value: None,
        source_date: None,
        provenance: Provenance::Unavailable,
    }
}

/// Overlay value next to the same-date curve factors and regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticRow {
    /// Curve date.
    pub date: Date,
    /// Carried macro value.
    pub macro_value: Option<f64>,
    /// Curve level.
    pub level: Option<f64>,
    /// Curve slope.
    pub slope: Option<f64>,
    /// Curve regime.
    pub regime: Option<RegimeLabel>,
}

/// Joins an overlay with factors and regimes on the overlay's dates.
#[must_use]
pub fn diagnostics(
    overlay: &MacroOverlay,
    factors: &FactorSeries,
    regimes: &RegimeSeries,
) -> Vec<DiagnosticRow> {
    overlay
        .points
        .iter()
        .map(|p| {
            let f = factors.get(p.date);
            DiagnosticRow {
                date: p.date,
                macro_value: p.value,
                level: f.map(|f| f.level),
                slope: f.map(|f| f.slope),
                regime: regimes.get(p.date),
            }
        })
        .collect()
}

/// A shaded recession interval, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecessionInterval {
    /// First flagged observation.
    pub start: Date,
    /// One day after the last flagged observation.
    pub end: Date,
}

/// Turns a 0/1 recession indicator into intervals.
///
/// Observations with `value >= threshold` are flagged. Consecutive flagged
/// observations more than `max_gap_days` apart start a new interval.
#[must_use]
pub fn recession_intervals(
    indicator: &MacroSeries,
    threshold: f64,
    max_gap_days: i64,
) -> Vec<RecessionInterval> {
    let mut intervals = Vec::new();
    let mut flagged = indicator
        .observations()
        .iter()
        .filter(|o| o.value >= threshold)
        .map(|o| o.date);

    let Some(first) = flagged.next() else {
        return intervals;
    };

    let (mut start, mut previous) = (first, first);
    for current in flagged {
        if current - previous > max_gap_days {
            intervals.push(RecessionInterval {
                start,
                end: previous.add_days(1),
            });
            start = current;
        }
        previous = current;
    }
    intervals.push(RecessionInterval {
        start,
        end: previous.add_days(1),
    });
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{FactorAnchors, Factors};
    use crate::regimes::RegimeThresholds;
    use crate::series::SeriesPoint;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn obs(y: i32, m: u32, d: u32, v: f64) -> MacroObservation {
        MacroObservation::new(date(y, m, d), v)
    }

    #[test]
    fn test_series_normalization() {
        let series = MacroSeries::new(
            "DFF",
            vec![
                obs(2024, 1, 3, 5.0),
                obs(2024, 1, 1, 4.0),
                obs(2024, 1, 3, 5.5),
                obs(2024, 1, 2, f64::NAN),
            ],
        );
        let values: Vec<_> = series.observations().iter().map(|o| o.value).collect();
        assert_eq!(values, vec![4.0, 5.5]);
        assert_eq!(series.display_name(), "DFF");
        assert_eq!(series.with_label("Fed Funds").display_name(), "Fed Funds");
    }

    #[test]
    fn test_align_nearest_prior() {
        let series = MacroSeries::new("GS10", vec![obs(2024, 1, 1, 4.0), obs(2024, 2, 1, 4.2)]);
        let curve = vec![
            date(2023, 12, 29),
            date(2024, 1, 1),
            date(2024, 1, 15),
            date(2024, 2, 5),
        ];
        let overlay = MacroJoin::align(&curve, Some(&series));

        assert_eq!(overlay.points[0].provenance, Provenance::Unavailable);
        assert_eq!(overlay.points[0].value, None);
        assert_eq!(overlay.points[1].value, Some(4.0));
        assert_eq!(overlay.points[2].value, Some(4.0));
        assert_eq!(overlay.points[2].source_date, Some(date(2024, 1, 1)));
        assert_eq!(overlay.points[3].value, Some(4.2));
        assert_eq!(overlay.joined_count(), 3);
    }

    #[test]
    fn test_align_without_source() {
        let curve = vec![date(2024, 1, 2), date(2024, 1, 3)];
        let overlay = MacroJoin::align(&curve, None);
        assert_eq!(overlay.series_id, None);
        assert_eq!(overlay.points.len(), 2);
        assert!(overlay.is_unavailable());

        let empty = MacroSeries::new("DFF", Vec::new());
        assert!(MacroJoin::align(&curve, Some(&empty)).is_unavailable());
    }

    #[test]
    fn test_between() {
        let series = MacroSeries::new(
            "X",
            vec![obs(2024, 1, 1, 1.0), obs(2024, 1, 5, 2.0), obs(2024, 1, 9, 3.0)],
        );
        assert_eq!(series.between(date(2024, 1, 2), date(2024, 1, 9)).len(), 2);
        assert!(series.between(date(2024, 1, 10), date(2024, 1, 2)).is_empty());
    }

    #[test]
    fn test_diagnostics_join() {
        let d1 = date(2024, 1, 2);
        let d2 = date(2024, 1, 3);
        let factors = FactorSeries {
            anchors: FactorAnchors::default(),
            points: vec![
                SeriesPoint::new(
                    d1,
                    Some(Factors {
                        level: 4.0,
                        slope: -0.5,
                        curvature: 0.0,
                    }),
                ),
                SeriesPoint::new(d2, None),
            ],
        };
        let regimes = crate::regimes::RegimeEngine::classify(&factors, &RegimeThresholds::default()).unwrap();
        let series = MacroSeries::new("DFF", vec![obs(2024, 1, 3, 5.3)]);
        let overlay = MacroJoin::align(&[d1, d2], Some(&series));

        let rows = diagnostics(&overlay, &factors, &regimes);
        assert_eq!(rows[0].macro_value, None);
        assert_eq!(rows[0].slope, Some(-0.5));
        assert_eq!(rows[0].regime, Some(RegimeLabel::Inverted));
        assert_eq!(rows[1].macro_value, Some(5.3));
        assert_eq!(rows[1].level, None);
        assert_eq!(rows[1].regime, None);
    }

    #[test]
    fn test_recession_intervals() {
        let usrec = MacroSeries::new(
            "USREC",
            vec![
                obs(2007, 11, 1, 0.0),
                obs(2007, 12, 1, 1.0),
                obs(2008, 1, 1, 1.0),
                obs(2008, 2, 1, 1.0),
                obs(2008, 3, 1, 0.0),
                obs(2020, 3, 1, 1.0),
                obs(2020, 4, 1, 1.0),
                obs(2020, 5, 1, 0.0),
            ],
        );
        let intervals = recession_intervals(&usrec, RECESSION_THRESHOLD, RECESSION_MAX_GAP_DAYS);
        assert_eq!(
            intervals,
            vec![
                RecessionInterval {
                    start: date(2007, 12, 1),
                    end: date(2008, 2, 2),
                },
                RecessionInterval {
                    start: date(2020, 3, 1),
                    end: date(2020, 4, 2),
                },
            ]
        );

        let calm = MacroSeries::new("USREC", vec![obs(2019, 1, 1, 0.0)]);
        assert!(recession_intervals(&calm, RECESSION_THRESHOLD, RECESSION_MAX_GAP_DAYS).is_empty());
    }
}
