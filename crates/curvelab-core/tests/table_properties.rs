//! Property tests for maturity labels and curve table loading.

use curvelab_core::prelude::*;
use proptest::prelude::*;

const LABELS: [&str; 4] = ["3M", "2Y", "10Y", "30Y"];

fn base_date() -> Date {
    Date::from_ymd(2020, 1, 1).unwrap()
}

/// Rows with distinct, shuffled-ish day offsets and random gaps.
fn rows_strategy() -> impl Strategy<Value = Vec<RawRow>> {
    prop::collection::btree_set(0i64..400, 1..40).prop_flat_map(|offsets| {
        let n = offsets.len();
        (
            Just(offsets.into_iter().collect::<Vec<_>>()),
            prop::collection::vec(
                prop::collection::vec(prop::option::weighted(0.8, 0.0f64..8.0), LABELS.len()),
                n,
            ),
        )
            .prop_map(|(offsets, values)| {
                offsets
                    .into_iter()
                    .rev()
                    .zip(values)
                    .map(|(offset, cells)| {
                        let mut row = RawRow::new(base_date().add_days(offset));
                        for (label, value) in LABELS.iter().zip(cells) {
                            row.push(*label, value);
                        }
                        row
                    })
                    .collect()
            })
    })
}

proptest! {
    #[test]
    fn maturity_label_round_trips(months in 1u32..=480) {
        let maturity = Maturity::from_months(months);
        let parsed: Maturity = maturity.to_string().parse().unwrap();
        prop_assert_eq!(parsed, maturity);
    }

    #[test]
    fn loaded_dates_are_strictly_increasing(rows in rows_strategy()) {
        match CurveTable::load(rows) {
            Ok(table) => {
                prop_assert!(table.dates().windows(2).all(|w| w[0] < w[1]));
                prop_assert_eq!(table.maturities().len(), LABELS.len());
                for date in table.dates() {
                    let row = table.row(*date).unwrap();
                    prop_assert!(row.iter().any(|(_, v)| v.is_some()));
                }
            }
            Err(err) => {
                let is_empty_dataset = matches!(err, CoreError::EmptyDataset { .. });
                prop_assert!(is_empty_dataset);
            }
        }
    }

    #[test]
    fn slice_keeps_exactly_the_dates_in_range(
        rows in rows_strategy(),
        start in 0i64..400,
        len in 0i64..200,
    ) {
        let Ok(table) = CurveTable::load(rows) else {
            return Ok(());
        };
        let (lo, hi) = (base_date().add_days(start), base_date().add_days(start + len));
        let sliced = table.slice(lo, hi);

        let expected: Vec<Date> = table
            .dates()
            .iter()
            .copied()
            .filter(|d| *d >= lo && *d <= hi)
            .collect();
        prop_assert_eq!(sliced.dates(), expected.as_slice());
        prop_assert_eq!(sliced.maturities(), table.maturities());
        for date in sliced.dates() {
            prop_assert_eq!(sliced.row(*date), table.row(*date));
        }
    }

    #[test]
    fn long_form_drops_only_missing_cells(rows in rows_strategy()) {
        let Ok(table) = CurveTable::load(rows) else {
            return Ok(());
        };
        let defined: usize = table
            .maturities()
            .iter()
            .map(|m| table.column(*m).unwrap().iter().filter(|v| v.is_some()).count())
            .sum();
        let long = table.to_long();
        prop_assert_eq!(long.len(), defined);
        for point in &long {
            prop_assert_eq!(table.value_at(point.date, point.maturity), Some(point.value));
        }
    }
}

#[test]
fn unknown_maturity_is_an_error_only_for_column_access() {
    let d = base_date();
    let table = CurveTable::load(vec![RawRow::new(d).with("2Y", Some(4.0))]).unwrap();

    assert_eq!(table.value_at(d, Maturity::Y10), None);
    assert!(matches!(
        table.column(Maturity::Y10),
        Err(CoreError::UnknownMaturity { maturity }) if maturity == Maturity::Y10
    ));
    assert!(table.require(&[Maturity::Y2]).is_ok());
}
