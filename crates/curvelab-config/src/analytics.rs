//! Transform settings: factor anchors, spread pairs, volatility and regimes.

use curvelab_analytics::factors::{FactorAnchors, LevelDefinition};
use curvelab_analytics::market_regimes::MarketRegimeQuantiles;
use curvelab_analytics::regimes::RegimeThresholds;
use curvelab_analytics::spreads::{SpreadEngine, SpreadPair, SpreadRegistry};
use curvelab_analytics::volatility::{VolatilitySpec, DEFAULT_WINDOW};
use curvelab_analytics::AnalyticsError;
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

// =============================================================================
// ANALYTICS CONFIGURATION
// =============================================================================

/// Settings passed to every transform call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Factor anchors and level definition.
    #[serde(default)]
    pub anchors: FactorAnchors,

    /// Volatility window and units.
    #[serde(default = "default_volatility")]
    pub volatility: VolatilitySpec,

    /// Regime thresholds.
    #[serde(default)]
    pub regimes: RegimeThresholds,

    /// Level and volatility quantiles for the market regimes.
    #[serde(default)]
    pub market_regimes: MarketRegimeQuantiles,

    /// Registered spread pairs, in display order.
    #[serde(default = "default_spread_pairs")]
    pub spread_pairs: Vec<SpreadPair>,
}

fn default_volatility() -> VolatilitySpec {
    VolatilitySpec::new(DEFAULT_WINDOW).in_basis_points()
}

fn default_spread_pairs() -> Vec<SpreadPair> {
    SpreadRegistry::standard().pairs().to_vec()
}

impl AnalyticsConfig {
    /// Builds the spread registry from the configured pairs.
    #[must_use]
    pub fn spread_registry(&self) -> SpreadRegistry {
        SpreadRegistry::from_pairs(self.spread_pairs.iter().cloned())
    }

    /// Builds a spread engine over the configured pairs.
    #[must_use]
    pub fn spread_engine(&self) -> SpreadEngine {
        SpreadEngine::new(self.spread_registry())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            anchors: FactorAnchors::default(),
            volatility: default_volatility(),
            regimes: RegimeThresholds::default(),
            market_regimes: MarketRegimeQuantiles::default(),
            spread_pairs: default_spread_pairs(),
        }
    }
}

impl Validate for AnalyticsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let a = &self.anchors;
        if !(a.short < a.mid && a.mid < a.long) {
            errors.push(ValidationError::with_rule(
                "anchors",
                format!(
                    "anchors must satisfy short < mid < long, got {}/{}/{}",
                    a.short, a.mid, a.long
                ),
                "ordered_anchors",
            ));
        }
        if let LevelDefinition::Average { maturities } = &a.level {
            if maturities.is_empty() {
                errors.push(ValidationError::new(
                    "anchors.level.maturities",
                    "Averaged level needs at least one maturity",
                ));
            }
        }

        if let Err(err) = self.volatility.validate() {
            let field = match err {
                AnalyticsError::InvalidWindow { .. } => "volatility.window",
                _ => "volatility",
            };
            errors.push(ValidationError::new(field, err.to_string()));
        }

        if let Err(err) = self.regimes.validate() {
            errors.push(ValidationError::with_rule(
                "regimes",
                err.to_string(),
                "low < 0 <= high, curvature >= 0",
            ));
        }

        if let Err(err) = self.market_regimes.validate() {
            let field = match &err {
                AnalyticsError::InvalidQuantile { name, .. } => format!("market_regimes.{name}"),
                _ => "market_regimes".to_string(),
            };
            errors.push(ValidationError::with_rule(
                field,
                err.to_string(),
                "0 <= level_low <= level_high <= 1, 0 <= vol_high <= 1",
            ));
        }

        if self.spread_pairs.is_empty() {
            errors.push(ValidationError::new(
                "spread_pairs",
                "At least one spread pair is required",
            ));
        }
        for (i, pair) in self.spread_pairs.iter().enumerate() {
            let field = format!("spread_pairs[{i}]");
            if pair.name.trim().is_empty() {
                errors.push(ValidationError::new(&field, "Name cannot be empty"));
            }
            if pair.short_leg == pair.long_leg {
                errors.push(ValidationError::with_rule(
                    &field,
                    format!("Legs must differ, both are {}", pair.short_leg),
                    "distinct_legs",
                ));
            }
            let duplicate = self.spread_pairs[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&pair.name));
            if duplicate {
                errors.push(ValidationError::with_rule(
                    &field,
                    format!("Duplicate pair name '{}'", pair.name),
                    "unique_names",
                ));
            }
        }

        errors
    }
}
