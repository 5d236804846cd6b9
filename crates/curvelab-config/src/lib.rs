//! CurveLab Configuration Layer
//!
//! Serializable settings for the CurveLab analytics workspace. All session
//! choices (anchor maturities, spread pairs, volatility window, regime
//! thresholds, macro catalogue) are plain data passed into each transform
//! call, so a configuration file fully reproduces a run.
//!
//! # Features
//!
//! - **Analytics**: factor anchors, spread registry, volatility units, regime thresholds
//! - **Sources**: curve CSV location and preamble, macro file directory
//! - **Macro Catalogue**: FRED series ids and labels, recession indicator
//! - **Validation**: field-level errors collected across every section
//!
//! # Example
//!
//! ```rust
//! use curvelab_config::{CurveLabConfig, Validate};
//!
//! let config = CurveLabConfig::from_toml_str(
//!     r#"
//!     [analytics.regimes]
//!     high = 0.3
//!     low = -0.3
//!     curvature = 0.25
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.is_valid());
//! assert_eq!(config.analytics.spread_engine().registry().pairs().len(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod analytics;
mod error;
mod settings;
mod sources;

// Re-export core types
pub use analytics::AnalyticsConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use settings::CurveLabConfig;
pub use sources::{DataConfig, MacroCatalogue, MacroSeriesConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytics::AnalyticsConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::settings::CurveLabConfig;
    pub use crate::sources::{DataConfig, MacroCatalogue};
}
