//! # CurveLab Analytics
//!
//! Transforms from a validated [`CurveTable`](curvelab_core::CurveTable)
//! into derived series for charting:
//!
//! - **Spreads**: named and custom maturity spreads
//! - **Factors**: fixed-anchor level, slope and curvature
//! - **Volatility**: rolling realized volatility of daily changes
//! - **Regimes**: steep/flat/inverted/humped labels and their timeline
//! - **Market regimes**: curve shape, rate level and volatility combined
//!   into risk-off/inversion/reflation/tight-policy/volatile/normal
//! - **Macro**: as-of alignment of external macro series, recession shading
//! - **Snapshot / Heatmap**: single-date curves and date × maturity matrices
//!
//! ## Architecture
//!
//! Every transform is a deterministic function of its inputs: no I/O, no
//! shared state, no caching. Configuration errors (unknown maturity, bad
//! window, bad thresholds) are returned immediately as [`AnalyticsError`];
//! data gaps surface as `None` points and never fail a call.
//!
//! The `parallel` feature spreads batch calls (`all_named`,
//! `rolling_vol_all`) across rayon's pool. Results are identical either way.
//!
//! ## Usage
//!
//! ```rust
//! use curvelab_core::prelude::*;
//! use curvelab_analytics::prelude::*;
//!
//! let d1 = Date::from_ymd(2024, 1, 2).unwrap();
//! let table = CurveTable::load(vec![RawRow::new(d1)
//!     .with("2y", Some(4.33))
//!     .with("5y", Some(3.93))
//!     .with("10y", Some(3.95))])
//! .unwrap();
//!
//! let spread = SpreadEngine::standard().named_spread(&table, "10Y-2Y").unwrap();
//! assert!(spread.latest().is_some());
//!
//! let factors = FactorEngine::decompose(&table, &FactorAnchors::default()).unwrap();
//! let regimes = RegimeEngine::classify(&factors, &RegimeThresholds::default()).unwrap();
//! assert_eq!(regimes.latest().map(|(_, label)| label), Some(RegimeLabel::Inverted));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod factors;
pub mod heatmap;
pub mod macro_join;
pub mod market_regimes;
pub mod regimes;
pub mod series;
pub mod snapshot;
pub mod spreads;
pub mod volatility;

pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
///
/// ```rust
/// use curvelab_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult};

    // Series
    pub use crate::series::SeriesPoint;

    // Spreads
    pub use crate::spreads::{custom_spread, SpreadEngine, SpreadPair, SpreadRegistry, SpreadSeries};

    // Factors
    pub use crate::factors::{
        CurvatureSign, Factor, FactorAnchors, FactorEngine, FactorSeries, Factors, LevelDefinition,
    };

    // Volatility
    pub use crate::volatility::{
        VolatilityEngine, VolatilitySeries, VolatilitySpec, DEFAULT_WINDOW, TRADING_DAYS_PER_YEAR,
    };

    // Regimes
    pub use crate::regimes::{
        classify_point, RegimeEngine, RegimeLabel, RegimeSegment, RegimeSeries, RegimeShare,
        RegimeThresholds, RegimeTimeline,
    };
    pub use crate::market_regimes::{
        LevelRegime, MarketRegime, MarketRegimeCutoffs, MarketRegimeEngine, MarketRegimePoint,
        MarketRegimeQuantiles, MarketRegimeSeries, MarketRegimeShare, VolRegime,
    };

    // Macro
    pub use crate::macro_join::{
        diagnostics, recession_intervals, DiagnosticRow, MacroJoin, MacroObservation,
        MacroOverlay, MacroSeries, OverlayPoint, Provenance, RecessionInterval,
    };

    // Views
    pub use crate::heatmap::{Heatmap, HeatmapUnit};
    pub use crate::snapshot::{compare, CurveComparison, CurveSnapshot};
}
