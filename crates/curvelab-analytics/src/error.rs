//! Error types for the analytics transforms.
//!
//! Every variant is a configuration problem raised before any value is
//! computed. Missing observations never produce an error; they surface as
//! `None` points in the returned series.

use curvelab_core::{CoreError, Maturity};
use thiserror::Error;

/// Error type for all analytics operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A requested maturity is not part of the table's schema.
    #[error("unknown maturity: {maturity} is not in the curve schema")]
    UnknownMaturity {
        /// The requested maturity.
        maturity: Maturity,
    },

    /// A spread pair name is not registered.
    #[error("unknown spread pair '{name}' (registered: {registered})")]
    UnknownPair {
        /// The requested pair name.
        name: String,
        /// Comma-separated registered names.
        registered: String,
    },

    /// Volatility window below the minimum of two changes.
    #[error("invalid volatility window {window}: at least 2 valid changes are required")]
    InvalidWindow {
        /// The rejected window.
        window: usize,
    },

    /// Regime thresholds violate `low < 0 <= high` or `curvature >= 0`.
    #[error("invalid regime thresholds: {reason}")]
    InvalidThresholds {
        /// Description of the violation.
        reason: String,
    },

    /// A regime quantile outside `[0, 1]`.
    #[error("invalid quantile {name} = {value}: must lie in [0, 1]")]
    InvalidQuantile {
        /// Setting name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Any other invalid transform setting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the core curve table.
    #[error(transparent)]
    Core(CoreError),
}

impl AnalyticsError {
    /// Creates an invalid thresholds error.
    #[must_use]
    pub fn invalid_thresholds(reason: impl Into<String>) -> Self {
        Self::InvalidThresholds {
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownMaturity { maturity } => Self::UnknownMaturity { maturity },
            other => Self::Core(other),
        }
    }
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
