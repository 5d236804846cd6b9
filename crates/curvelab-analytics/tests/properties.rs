//! Property tests for the curve transforms.

use curvelab_analytics::prelude::*;
use curvelab_core::{CurveTable, Date, Maturity, RawRow};
use proptest::prelude::*;

const LABELS: [&str; 4] = ["3m", "2y", "5y", "10y"];

/// Rows of optional yields for the four test maturities; at least one cell
/// per row is present so no row is dropped at load.
fn rows_strategy(max_days: usize) -> impl Strategy<Value = Vec<[Option<f64>; 4]>> {
    let cell = prop::option::weighted(0.85, 0.0f64..8.0);
    let row = [cell.clone(), cell.clone(), cell.clone(), cell]
        .prop_map(|mut r| {
            if r.iter().all(Option::is_none) {
                r[3] = Some(4.0);
            }
            r
        });
    prop::collection::vec(row, 1..max_days)
}

fn build_table(rows: &[[Option<f64>; 4]]) -> CurveTable {
    let start = Date::from_ymd(2020, 1, 1).unwrap();
    let raw = rows.iter().enumerate().map(|(i, cells)| {
        let mut row = RawRow::new(start.add_days(i as i64));
        for (label, value) in LABELS.iter().zip(cells) {
            row.push(*label, *value);
        }
        row
    });
    CurveTable::load(raw).unwrap()
}

fn thresholds() -> RegimeThresholds {
    RegimeThresholds::new(0.3, -0.3, 0.25).unwrap()
}

proptest! {
    #[test]
    fn custom_spread_is_leg_difference(rows in rows_strategy(60)) {
        let table = build_table(&rows);
        let series = custom_spread(&table, Maturity::Y2, Maturity::Y10).unwrap();

        prop_assert_eq!(series.len(), table.len());
        for point in &series.points {
            let short = table.value_at(point.date, Maturity::Y2);
            let long = table.value_at(point.date, Maturity::Y10);
            match (short, long) {
                (Some(s), Some(l)) => prop_assert_eq!(point.value, Some(l - s)),
                _ => prop_assert_eq!(point.value, None),
            }
        }
    }

    #[test]
    fn decompose_is_stable_under_slice(
        rows in rows_strategy(60),
        a in 0usize..60,
        b in 0usize..60,
    ) {
        let table = build_table(&rows);
        let dates = table.dates();
        let (lo, hi) = (a.min(b) % dates.len(), a.max(b) % dates.len());
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let sliced = table.slice(dates[lo], dates[hi]);

        let anchors = FactorAnchors::default();
        let full = FactorEngine::decompose(&table, &anchors).unwrap();
        let part = FactorEngine::decompose(&sliced, &anchors).unwrap();

        for point in &part.points {
            prop_assert_eq!(point.value, full.get(point.date));
        }
    }

    #[test]
    fn rolling_vol_has_no_look_ahead(
        rows in rows_strategy(80),
        cut in 0usize..80,
        window in 2usize..10,
    ) {
        let table = build_table(&rows);
        let dates = table.dates();
        let cut = dates[cut % dates.len()];
        let truncated = table.slice(dates[0], cut);

        let full = VolatilityEngine::rolling_vol(&table, Maturity::Y5, window).unwrap();
        let head = VolatilityEngine::rolling_vol(&truncated, Maturity::Y5, window).unwrap();

        prop_assert_eq!(head.points.len(), truncated.len());
        for (h, f) in head.points.iter().zip(&full.points) {
            prop_assert_eq!(h, f);
        }
    }

    #[test]
    fn timeline_round_trips(rows in rows_strategy(80)) {
        let table = build_table(&rows);
        let factors = FactorEngine::decompose(
            &table,
            &FactorAnchors::new(Maturity::M3, Maturity::Y5, Maturity::Y10),
        )
        .unwrap();
        let regimes = RegimeEngine::classify(&factors, &thresholds()).unwrap();
        let timeline = RegimeEngine::to_timeline(&regimes);

        prop_assert_eq!(timeline.expand(table.dates()), regimes.points.clone());

        let covered: usize = timeline.segments.iter().map(|s| s.observations).sum();
        let defined = regimes.points.iter().filter(|p| p.is_defined()).count();
        prop_assert_eq!(covered, defined);
        for pair in timeline.segments.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn missing_anchor_blanks_only_its_date(rows in rows_strategy(40), hole in 0usize..40) {
        let mut rows = rows;
        let hole = hole % rows.len();
        rows[hole][2] = None;
        if rows[hole].iter().all(Option::is_none) {
            rows[hole][0] = Some(1.0);
        }
        let table = build_table(&rows);
        let factors = FactorEngine::decompose(&table, &FactorAnchors::default()).unwrap();

        prop_assert_eq!(factors.points[hole].value, None);
        for (i, point) in factors.points.iter().enumerate() {
            let complete = rows[i][1].is_some() && rows[i][2].is_some() && rows[i][3].is_some();
            prop_assert_eq!(point.value.is_some(), complete);
        }
    }

    #[test]
    fn macro_join_never_looks_ahead(
        rows in rows_strategy(40),
        offsets in prop::collection::vec((0i64..60, -5.0f64..5.0), 0..20),
    ) {
        let table = build_table(&rows);
        let start = Date::from_ymd(2019, 12, 20).unwrap();
        let series = MacroSeries::new(
            "X",
            offsets
                .into_iter()
                .map(|(d, v)| MacroObservation::new(start.add_days(d), v)),
        );

        let overlay = MacroJoin::align(table.dates(), Some(&series));
        for point in &overlay.points {
            match point.source_date {
                Some(source) => {
                    prop_assert!(source <= point.date);
                    prop_assert_eq!(point.provenance, Provenance::Joined);
                }
                None => prop_assert_eq!(point.provenance, Provenance::Unavailable),
            }
        }
    }
}

#[test]
fn decompose_rejects_anchor_outside_schema() {
    let table = build_table(&[[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]]);
    let anchors = FactorAnchors::new(Maturity::Y2, Maturity::Y5, Maturity::Y30);
    assert_eq!(
        FactorEngine::decompose(&table, &anchors).unwrap_err(),
        AnalyticsError::UnknownMaturity {
            maturity: Maturity::Y30
        }
    );
}
