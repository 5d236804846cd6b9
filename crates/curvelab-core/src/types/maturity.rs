//! Maturity (tenor) points on the yield curve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A named tenor point on the curve, stored as a whole number of months.
///
/// Labels such as `3M`, `2Y`, `10y` or `0.5y` parse into the same ordered
/// type, so `12M` and `1Y` are the same maturity.
///
/// # Example
///
/// ```rust
/// use curvelab_core::types::Maturity;
///
/// let m: Maturity = "10y".parse().unwrap();
/// assert_eq!(m, Maturity::Y10);
/// assert_eq!(m.to_string(), "10Y");
/// assert_eq!("0.5y".parse::<Maturity>().unwrap().months(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Maturity {
    /// Number of months.
    months: u32,
}

impl Maturity {
    /// Creates a new maturity from months.
    #[must_use]
    pub const fn from_months(months: u32) -> Self {
        Self { months }
    }

    /// Creates a new maturity from years.
    #[must_use]
    pub const fn from_years(years: u32) -> Self {
        Self { months: years * 12 }
    }

    /// Returns the maturity in months.
    #[must_use]
    pub const fn months(&self) -> u32 {
        self.months
    }

    /// Returns the maturity in years.
    #[must_use]
    pub fn years(&self) -> f64 {
        f64::from(self.months) / 12.0
    }

    /// Parses a maturity label (`<number><unit>`, unit `m`/`M` or `y`/`Y`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidMaturity` if the label is malformed, not
    /// positive, or not a whole number of months.
    pub fn parse(label: &str) -> CoreResult<Self> {
        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        let unit = chars
            .next_back()
            .ok_or_else(|| CoreError::invalid_maturity(label, "empty label"))?;
        let per_unit = match unit {
            'm' | 'M' => 1.0,
            'y' | 'Y' => 12.0,
            _ => {
                return Err(CoreError::invalid_maturity(
                    label,
                    "unit must be 'M' (months) or 'Y' (years)",
                ))
            }
        };

        let amount: f64 = chars
            .as_str()
            .parse()
            .map_err(|_| CoreError::invalid_maturity(label, "amount is not a number"))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::invalid_maturity(label, "amount must be positive"));
        }

        let months = amount * per_unit;
        let rounded = months.round();
        if rounded < 1.0 {
            return Err(CoreError::invalid_maturity(label, "amount must be positive"));
        }
        if (months - rounded).abs() > 1e-9 || rounded > f64::from(u32::MAX) {
            return Err(CoreError::invalid_maturity(
                label,
                "must be a whole number of months",
            ));
        }

        Ok(Self::from_months(rounded as u32))
    }

    /// 1-month maturity.
    pub const M1: Self = Self::from_months(1);
    /// 3-month maturity.
    pub const M3: Self = Self::from_months(3);
    /// 6-month maturity.
    pub const M6: Self = Self::from_months(6);
    /// 1-year maturity.
    pub const Y1: Self = Self::from_years(1);
    /// 2-year maturity.
    pub const Y2: Self = Self::from_years(2);
    /// 3-year maturity.
    pub const Y3: Self = Self::from_years(3);
    /// 5-year maturity.
    pub const Y5: Self = Self::from_years(5);
    /// 7-year maturity.
    pub const Y7: Self = Self::from_years(7);
    /// 10-year maturity.
    pub const Y10: Self = Self::from_years(10);
    /// 20-year maturity.
    pub const Y20: Self = Self::from_years(20);
    /// 30-year maturity.
    pub const Y30: Self = Self::from_years(30);
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months >= 12 && self.months % 12 == 0 {
            write!(f, "{}Y", self.months / 12)
        } else {
            write!(f, "{}M", self.months)
        }
    }
}

impl FromStr for Maturity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Maturity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Maturity> for String {
    fn from(maturity: Maturity) -> Self {
        maturity.to_string()
    }
}
