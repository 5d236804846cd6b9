//! Domain types for curve analytics.
//!
//! - [`Date`]: Calendar date of a curve observation
//! - [`Maturity`]: Tenor point on the curve

mod date;
mod maturity;

pub use date::Date;
pub use maturity::Maturity;
