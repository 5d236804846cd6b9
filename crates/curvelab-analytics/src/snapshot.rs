//! Single-date curve views.

use curvelab_core::{CurveTable, Date, Maturity};
use serde::{Deserialize, Serialize};

/// One maturity of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    /// Maturity.
    pub maturity: Maturity,
    /// Yield in percent.
    #[serde(rename = "yield")]
    pub value: f64,
}

/// The curve observed on one date, missing maturities omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    /// Observation date.
    pub date: Date,
    /// Points in ascending maturity order.
    pub points: Vec<SnapshotPoint>,
}

impl CurveSnapshot {
    /// The curve on `date`, `None` if the table has no such date.
    #[must_use]
    pub fn at(table: &CurveTable, date: Date) -> Option<Self> {
        let row = table.row(date)?;
        let points = row
            .into_iter()
            .filter_map(|(maturity, value)| value.map(|value| SnapshotPoint { maturity, value }))
            .collect();
        Some(Self { date, points })
    }

    /// The curve on the table's last date.
    #[must_use]
    pub fn latest(table: &CurveTable) -> Option<Self> {
        Self::at(table, table.last_date()?)
    }

    /// Yield at a maturity, if observed.
    #[must_use]
    pub fn value(&self, maturity: Maturity) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.maturity == maturity)
            .map(|p| p.value)
    }
}

/// One maturity of a two-date comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    /// Maturity.
    pub maturity: Maturity,
    /// Yield on the comparison date.
    #[serde(rename = "yield")]
    pub value: Option<f64>,
    /// Yield on the base date.
    pub base_value: Option<f64>,
    /// `value - base_value` in basis points.
    pub change_bp: Option<f64>,
}

/// Two curves side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveComparison {
    /// Comparison date.
    pub date: Date,
    /// Base date.
    pub base_date: Date,
    /// One point per schema maturity.
    pub points: Vec<ComparisonPoint>,
}

/// Compares the curve on `date` with the curve on `base_date`.
///
/// Returns `None` if either date is absent from the table.
#[must_use]
pub fn compare(table: &CurveTable, date: Date, base_date: Date) -> Option<CurveComparison> {
    let current = table.row(date)?;
    let base = table.row(base_date)?;

    let points = current
        .into_iter()
        .zip(base)
        .map(|((maturity, value), (_, base_value))| ComparisonPoint {
            maturity,
            value,
            base_value,
            change_bp: value.zip(base_value).map(|(v, b)| (v - b) * 100.0),
        })
        .collect();

    Some(CurveComparison {
        date,
        base_date,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curvelab_core::RawRow;

    fn date(d: u32) -> Date {
        Date::from_ymd(2025, 9, d).unwrap()
    }

    fn table() -> CurveTable {
        CurveTable::load(vec![
            RawRow::new(date(1))
                .with("3m", Some(4.3))
                .with("2y", Some(3.6))
                .with("10y", Some(4.2)),
            RawRow::new(date(2))
                .with("3m", Some(4.25))
                .with("2y", None)
                .with("10y", Some(4.35)),
        ])
        .unwrap()
    }

    #[test]
    fn test_snapshot_skips_missing() {
        let t = table();
        let snap = CurveSnapshot::at(&t, date(2)).unwrap();
        let maturities: Vec<_> = snap.points.iter().map(|p| p.maturity).collect();
        assert_eq!(maturities, vec![Maturity::M3, Maturity::Y10]);
        assert_eq!(snap.value(Maturity::Y2), None);

        assert!(CurveSnapshot::at(&t, date(3)).is_none());
        assert_eq!(CurveSnapshot::latest(&t).map(|s| s.date), Some(date(2)));
    }

    #[test]
    fn test_compare_in_basis_points() {
        let cmp = compare(&table(), date(2), date(1)).unwrap();
        assert_eq!(cmp.points.len(), 3);
        assert_relative_eq!(cmp.points[0].change_bp.unwrap(), -5.0, epsilon = 1e-9);
        assert_eq!(cmp.points[1].change_bp, None);
        assert_eq!(cmp.points[1].base_value, Some(3.6));
        assert_relative_eq!(cmp.points[2].change_bp.unwrap(), 15.0, epsilon = 1e-9);

        assert!(compare(&table(), date(2), date(9)).is_none());
    }
}
