//! Dated points shared by every derived series.

use curvelab_core::Date;
use serde::{Deserialize, Serialize};

/// One dated value of a derived series. `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<T = f64> {
    /// Date of the value.
    pub date: Date,
    /// The value, if defined on this date.
    pub value: Option<T>,
}

impl<T> SeriesPoint<T> {
    /// Creates a point.
    #[must_use]
    pub fn new(date: Date, value: Option<T>) -> Self {
        Self { date, value }
    }

    /// Returns true if the value is defined.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

/// Returns the last defined `(date, value)` of a series.
pub fn latest_defined<T: Copy>(points: &[SeriesPoint<T>]) -> Option<(Date, T)> {
    points
        .iter()
        .rev()
        .find_map(|p| p.value.map(|v| (p.date, v)))
}

/// Looks up the point on `date` in a date-ordered series.
pub fn point_at<T>(points: &[SeriesPoint<T>], date: Date) -> Option<&SeriesPoint<T>> {
    points
        .binary_search_by_key(&date, |p| p.date)
        .ok()
        .map(|i| &points[i])
}
