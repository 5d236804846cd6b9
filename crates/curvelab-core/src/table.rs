//! The validated yield curve table.
//!
//! A [`CurveTable`] is built once from raw rows and is immutable afterwards.
//! Loading is the only place the schema is checked: every row must carry the
//! same set of maturity labels, dates are sorted, fully-missing rows are
//! dropped, and duplicate dates are rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Maturity};

/// One raw input row: a date and its `(maturity label, yield)` cells.
///
/// Yields are in percent. `None` and non-finite values are both treated as
/// missing observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Observation date.
    pub date: Date,
    /// Cells keyed by maturity label, e.g. `("10y", Some(4.21))`.
    pub cells: Vec<(String, Option<f64>)>,
}

impl RawRow {
    /// Creates a row with no cells.
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self {
            date,
            cells: Vec::new(),
        }
    }

    /// Adds a cell, builder style.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: Option<f64>) -> Self {
        self.push(label, value);
        self
    }

    /// Adds a cell.
    pub fn push(&mut self, label: impl Into<String>, value: Option<f64>) {
        self.cells.push((label.into(), value));
    }
}

/// A single non-missing observation in long form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Observation date.
    pub date: Date,
    /// Curve maturity.
    pub maturity: Maturity,
    /// Yield in percent.
    #[serde(rename = "yield")]
    pub value: f64,
}

/// Daily zero-coupon yield curves: ascending unique dates × a fixed,
/// ascending set of maturities.
///
/// Cells are `Option<f64>` yields in percent; `None` marks a missing
/// observation. The table has no mutation methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveTable {
    dates: Vec<Date>,
    maturities: Vec<Maturity>,
    /// Column-major storage, `columns[maturity][date]`.
    columns: Vec<Vec<Option<f64>>>,
}

impl CurveTable {
    /// Builds a validated table from raw rows.
    ///
    /// # Errors
    ///
    /// - `CoreError::Schema` if the rows do not share one set of parseable,
    ///   distinct maturity labels
    /// - `CoreError::DateOrder` if a date repeats after sorting
    /// - `CoreError::EmptyDataset` if no row has at least one observation
    pub fn load<I>(rows: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let rows: Vec<RawRow> = rows.into_iter().collect();
        let first = rows
            .first()
            .ok_or_else(|| CoreError::empty_dataset("no rows were supplied"))?;

        let maturities = schema_from_row(first)?;
        let mut parsed: Vec<(Date, Vec<Option<f64>>)> = rows
            .iter()
            .map(|row| Ok((row.date, align_row(row, &maturities)?)))
            .collect::<CoreResult<_>>()?;

        parsed.sort_by_key(|(date, _)| *date);

        let before = parsed.len();
        parsed.retain(|(_, values)| values.iter().any(Option::is_some));
        if parsed.len() < before {
            log::debug!(
                "dropped {} fully-missing curve rows",
                before - parsed.len()
            );
        }

        if let Some(pair) = parsed.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(CoreError::DateOrder {
                date: pair[1].0,
                previous: pair[0].0,
            });
        }

        if parsed.is_empty() {
            return Err(CoreError::empty_dataset(
                "no rows with at least one observed yield remain",
            ));
        }

        let weekend = parsed.iter().filter(|(date, _)| date.is_weekend()).count();
        if weekend > 0 {
            log::warn!("{weekend} curve dates fall on a weekend");
        }

        let mut columns = vec![Vec::with_capacity(parsed.len()); maturities.len()];
        let mut dates = Vec::with_capacity(parsed.len());
        for (date, values) in parsed {
            dates.push(date);
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        log::debug!(
            "loaded curve table: {} dates x {} maturities",
            dates.len(),
            maturities.len()
        );

        Ok(Self {
            dates,
            maturities,
            columns,
        })
    }

    /// Returns the sub-table with dates in `[start, end]`.
    ///
    /// The schema is preserved. If no dates fall in range (including when
    /// `start > end`) the result is an empty table, not an error.
    #[must_use]
    pub fn slice(&self, start: Date, end: Date) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);

        Self {
            dates: self.dates[lo..hi].to_vec(),
            maturities: self.maturities.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| column[lo..hi].to_vec())
                .collect(),
        }
    }

    /// Returns the yield at `(date, maturity)`.
    ///
    /// `None` when the cell is missing, the date is not in the table, or the
    /// maturity is not in the schema. Use [`CurveTable::column`] when an
    /// unknown maturity must be an error.
    #[must_use]
    pub fn value_at(&self, date: Date, maturity: Maturity) -> Option<f64> {
        let row = self.date_index(date)?;
        let col = self.maturity_index(maturity)?;
        self.columns[col][row]
    }

    /// Returns the full column for a maturity, aligned with [`CurveTable::dates`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownMaturity` if the maturity is not in the schema.
    pub fn column(&self, maturity: Maturity) -> CoreResult<&[Option<f64>]> {
        self.maturity_index(maturity)
            .map(|col| self.columns[col].as_slice())
            .ok_or_else(|| CoreError::unknown_maturity(maturity))
    }

    /// Checks that every maturity is part of the schema.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownMaturity` for the first absent maturity.
    pub fn require(&self, maturities: &[Maturity]) -> CoreResult<()> {
        match maturities.iter().find(|m| !self.has_maturity(**m)) {
            Some(missing) => Err(CoreError::unknown_maturity(*missing)),
            None => Ok(()),
        }
    }

    /// Returns the `(maturity, yield)` cells of one date in maturity order.
    #[must_use]
    pub fn row(&self, date: Date) -> Option<Vec<(Maturity, Option<f64>)>> {
        let row = self.date_index(date)?;
        Some(
            self.maturities
                .iter()
                .zip(&self.columns)
                .map(|(maturity, column)| (*maturity, column[row]))
                .collect(),
        )
    }

    /// Converts the table to long form, dropping missing cells.
    ///
    /// Points are ordered by date, then by maturity.
    #[must_use]
    pub fn to_long(&self) -> Vec<CurvePoint> {
        let mut points = Vec::new();
        for (row, date) in self.dates.iter().enumerate() {
            for (maturity, column) in self.maturities.iter().zip(&self.columns) {
                if let Some(value) = column[row] {
                    points.push(CurvePoint {
                        date: *date,
                        maturity: *maturity,
                        value,
                    });
                }
            }
        }
        points
    }

    /// Returns the observation dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the schema maturities in ascending order.
    #[must_use]
    pub fn maturities(&self) -> &[Maturity] {
        &self.maturities
    }

    /// Returns the row index of a date.
    #[must_use]
    pub fn date_index(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Returns the column index of a maturity.
    #[must_use]
    pub fn maturity_index(&self, maturity: Maturity) -> Option<usize> {
        self.maturities.binary_search(&maturity).ok()
    }

    /// Returns true if the maturity is part of the schema.
    #[must_use]
    pub fn has_maturity(&self, maturity: Maturity) -> bool {
        self.maturity_index(maturity).is_some()
    }

    /// Returns the first date, if any.
    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Returns the last date, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the table has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Parses the first row's labels into the sorted schema.
fn schema_from_row(row: &RawRow) -> CoreResult<Vec<Maturity>> {
    if row.cells.is_empty() {
        return Err(CoreError::schema("no maturity columns"));
    }

    let mut seen: BTreeMap<Maturity, &str> = BTreeMap::new();
    for (label, _) in &row.cells {
        let maturity = Maturity::parse(label)
            .map_err(|e| CoreError::schema(format!("column '{label}': {e}")))?;
        if let Some(previous) = seen.insert(maturity, label.as_str()) {
            return Err(CoreError::schema(format!(
                "columns '{previous}' and '{label}' both denote {maturity}"
            )));
        }
    }

    Ok(seen.into_keys().collect())
}

/// Places a row's cells in schema order, rejecting any schema mismatch.
fn align_row(row: &RawRow, maturities: &[Maturity]) -> CoreResult<Vec<Option<f64>>> {
    if row.cells.len() != maturities.len() {
        return Err(CoreError::schema(format!(
            "row {} has {} maturity columns, expected {}",
            row.date,
            row.cells.len(),
            maturities.len()
        )));
    }

    let mut values: Vec<Option<Option<f64>>> = vec![None; maturities.len()];
    for (label, value) in &row.cells {
        let maturity = Maturity::parse(label)
            .map_err(|e| CoreError::schema(format!("row {}: column '{label}': {e}", row.date)))?;
        let slot = maturities
            .binary_search(&maturity)
            .map_err(|_| CoreError::schema(format!("row {}: unexpected column '{label}'", row.date)))?;
        if values[slot].is_some() {
            return Err(CoreError::schema(format!(
                "row {}: {maturity} given more than once",
                row.date
            )));
        }
        values[slot] = Some(value.filter(|v| v.is_finite()));
    }

    // Lengths match and every slot is unique, so all slots are filled.
    Ok(values.into_iter().map(Option::flatten).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn row(d: Date, two: Option<f64>, ten: Option<f64>) -> RawRow {
        RawRow::new(d).with("2y", two).with("10y", ten)
    }

    #[test]
    fn test_load_sorts_and_orders_schema() {
        let table = CurveTable::load(vec![
            RawRow::new(date(2024, 1, 3)).with("10y", Some(4.0)).with("3m", Some(5.3)),
            RawRow::new(date(2024, 1, 2)).with("3M", Some(5.4)).with("10Y", Some(3.9)),
        ])
        .unwrap();

        assert_eq!(table.dates(), &[date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(table.maturities(), &[Maturity::M3, Maturity::Y10]);
        assert_eq!(table.value_at(date(2024, 1, 2), Maturity::Y10), Some(3.9));
        assert_eq!(table.value_at(date(2024, 1, 3), Maturity::M3), Some(5.3));
    }

    #[test]
    fn test_load_rejects_inconsistent_columns() {
        let err = CurveTable::load(vec![
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
            RawRow::new(date(2024, 1, 3)).with("2y", Some(4.0)).with("5y", Some(4.1)),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema { .. }));

        let err = CurveTable::load(vec![
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
            RawRow::new(date(2024, 1, 3)).with("2y", Some(4.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema { .. }));
    }

    #[test]
    fn test_load_rejects_bad_labels() {
        let err = CurveTable::load(vec![RawRow::new(date(2024, 1, 2))
            .with("2y", Some(4.0))
            .with("Volume", Some(1.0))])
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema { .. }));

        let err = CurveTable::load(vec![RawRow::new(date(2024, 1, 2))
            .with("12m", Some(4.0))
            .with("1y", Some(4.0))])
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema { .. }));

        let err = CurveTable::load(vec![RawRow::new(date(2024, 1, 2))]).unwrap_err();
        assert!(matches!(err, CoreError::Schema { .. }));
    }

    #[test]
    fn test_load_rejects_duplicate_dates() {
        let err = CurveTable::load(vec![
            row(date(2024, 1, 3), Some(4.0), Some(4.1)),
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
            row(date(2024, 1, 3), Some(4.2), Some(4.3)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::DateOrder {
                date: date(2024, 1, 3),
                previous: date(2024, 1, 3),
            }
        );
    }

    #[test]
    fn test_duplicate_of_dropped_row_is_not_an_error() {
        let table = CurveTable::load(vec![
            row(date(2024, 1, 2), None, None),
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_drops_fully_missing_rows() {
        let table = CurveTable::load(vec![
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
            row(date(2024, 1, 3), None, Some(f64::NAN)),
            row(date(2024, 1, 4), None, Some(4.2)),
        ])
        .unwrap();

        assert_eq!(table.dates(), &[date(2024, 1, 2), date(2024, 1, 4)]);
        assert_eq!(table.value_at(date(2024, 1, 4), Maturity::Y2), None);
    }

    #[test]
    fn test_load_empty_dataset() {
        let err = CurveTable::load(Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyDataset { .. }));

        let err = CurveTable::load(vec![row(date(2024, 1, 2), None, None)]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyDataset { .. }));
    }

    #[test]
    fn test_slice_inclusive_and_empty() {
        let table = CurveTable::load(vec![
            row(date(2024, 1, 2), Some(4.0), Some(4.1)),
            row(date(2024, 1, 3), Some(4.1), Some(4.2)),
            row(date(2024, 1, 4), Some(4.2), Some(4.3)),
        ])
        .unwrap();

        let sliced = table.slice(date(2024, 1, 3), date(2024, 1, 4));
        assert_eq!(sliced.dates(), &[date(2024, 1, 3), date(2024, 1, 4)]);
        assert_eq!(sliced.maturities(), table.maturities());
        assert_eq!(sliced.value_at(date(2024, 1, 3), Maturity::Y10), Some(4.2));

        let empty = table.slice(date(2025, 1, 1), date(2025, 12, 31));
        assert!(empty.is_empty());
        assert_eq!(empty.maturities(), table.maturities());

        let inverted = table.slice(date(2024, 1, 4), date(2024, 1, 2));
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_column_and_require() {
        let table = CurveTable::load(vec![row(date(2024, 1, 2), Some(4.0), None)]).unwrap();

        assert_eq!(table.column(Maturity::Y2).unwrap(), &[Some(4.0)]);
        assert_eq!(table.column(Maturity::Y10).unwrap(), &[None]);
        assert_eq!(
            table.column(Maturity::Y5).unwrap_err(),
            CoreError::unknown_maturity(Maturity::Y5)
        );
        assert!(table.require(&[Maturity::Y2, Maturity::Y10]).is_ok());
        assert!(table.require(&[Maturity::Y2, Maturity::Y30]).is_err());
        assert_eq!(table.value_at(date(2024, 1, 2), Maturity::Y30), None);
    }

    #[test]
    fn test_row_and_long_form() {
        let table = CurveTable::load(vec![
            row(date(2024, 1, 2), Some(4.0), None),
            row(date(2024, 1, 3), Some(4.1), Some(4.2)),
        ])
        .unwrap();

        assert_eq!(
            table.row(date(2024, 1, 2)).unwrap(),
            vec![(Maturity::Y2, Some(4.0)), (Maturity::Y10, None)]
        );
        assert!(table.row(date(2024, 1, 5)).is_none());

        let long = table.to_long();
        assert_eq!(long.len(), 3);
        assert_eq!(long[2].date, date(2024, 1, 3));
        assert_eq!(long[2].maturity, Maturity::Y10);
    }
}
