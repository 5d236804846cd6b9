//! Date by maturity matrices for heatmap views.

use curvelab_core::{CurvePoint, CurveTable, Date, Maturity};
use serde::{Deserialize, Serialize};

/// Unit of the heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapUnit {
    /// Yield levels in percent.
    Percent,
    /// Day-over-day changes in basis points.
    BasisPoints,
}

/// Row-major matrix of cells, one row per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Row dates.
    pub dates: Vec<Date>,
    /// Column maturities.
    pub maturities: Vec<Maturity>,
    /// `cells[row][col]`.
    pub cells: Vec<Vec<Option<f64>>>,
    /// Unit of every cell.
    pub unit: HeatmapUnit,
}

impl Heatmap {
    /// Yield levels, missing cells preserved.
    #[must_use]
    pub fn levels(table: &CurveTable) -> Self {
        let cells = (0..table.len())
            .map(|i| {
                table
                    .maturities()
                    .iter()
                    .map(|m| table.value_at(table.dates()[i], *m))
                    .collect()
            })
            .collect();

        Self {
            dates: table.dates().to_vec(),
            maturities: table.maturities().to_vec(),
            cells,
            unit: HeatmapUnit::Percent,
        }
    }

    /// Day-over-day changes in basis points. The first row and any change
    /// touching a missing cell are missing.
    #[must_use]
    pub fn changes_bp(table: &CurveTable) -> Self {
        let levels = Self::levels(table);
        let width = levels.maturities.len();

        let cells = levels
            .cells
            .iter()
            .enumerate()
            .map(|(i, row)| match i.checked_sub(1).map(|p| &levels.cells[p]) {
                Some(prev) => row
                    .iter()
                    .zip(prev)
                    .map(|(c, p)| c.zip(*p).map(|(c, p)| (c - p) * 100.0))
                    .collect(),
                None => vec![None; width],
            })
            .collect();

        Self {
            cells,
            unit: HeatmapUnit::BasisPoints,
            ..levels
        }
    }

    /// Cell value.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Smallest and largest defined cell.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Long-form defined cells.
    #[must_use]
    pub fn to_long(&self) -> Vec<CurvePoint> {
        self.dates
            .iter()
            .zip(&self.cells)
            .flat_map(|(date, row)| {
                self.maturities
                    .iter()
                    .zip(row)
                    .filter_map(move |(maturity, value)| {
                        value.map(|value| CurvePoint {
                            date: *date,
                            maturity: *maturity,
                            value,
                        })
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curvelab_core::RawRow;

    fn date(d: u32) -> Date {
        Date::from_ymd(2022, 2, d).unwrap()
    }

    fn table() -> CurveTable {
        CurveTable::load(vec![
            RawRow::new(date(1)).with("2y", Some(1.0)).with("10y", Some(1.8)),
            RawRow::new(date(2)).with("2y", Some(1.1)).with("10y", None),
            RawRow::new(date(3)).with("2y", Some(1.05)).with("10y", Some(1.9)),
        ])
        .unwrap()
    }

    #[test]
    fn test_levels() {
        let map = Heatmap::levels(&table());
        assert_eq!(map.unit, HeatmapUnit::Percent);
        assert_eq!(map.cells.len(), 3);
        assert_eq!(map.get(1, 1), None);
        assert_eq!(map.get(0, 1), Some(1.8));
        assert_eq!(map.range(), Some((1.0, 1.9)));
        assert_eq!(map.to_long().len(), 5);
    }

    #[test]
    fn test_changes_bp() {
        let map = Heatmap::changes_bp(&table());
        assert_eq!(map.unit, HeatmapUnit::BasisPoints);
        assert_eq!(map.cells[0], vec![None, None]);
        assert_relative_eq!(map.get(1, 0).unwrap(), 10.0, epsilon = 1e-9);
        assert_eq!(map.get(1, 1), None);
        assert_relative_eq!(map.get(2, 0).unwrap(), -5.0, epsilon = 1e-9);
        assert_eq!(map.get(2, 1), None);
    }
}
