//! Error types for the CurveLab core.
//!
//! Everything here is a load-time or configuration failure. Data gaps are
//! never errors; they travel through the table as `None`.

use thiserror::Error;

use crate::types::{Date, Maturity};

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Input rows do not share one well-formed maturity schema.
    #[error("Schema error: {reason}")]
    Schema {
        /// Description of the schema violation.
        reason: String,
    },

    /// Dates are not strictly increasing after normalization.
    #[error("Date order error: {date} appears more than once (previous row {previous})")]
    DateOrder {
        /// The offending date.
        date: Date,
        /// The date of the preceding row.
        previous: Date,
    },

    /// No usable rows remain after dropping fully-missing rows.
    #[error("Empty dataset: {reason}")]
    EmptyDataset {
        /// Description of why nothing remained.
        reason: String,
    },

    /// A maturity was requested that is not part of the table's schema.
    #[error("Unknown maturity: {maturity} is not in the curve schema")]
    UnknownMaturity {
        /// The requested maturity.
        maturity: Maturity,
    },

    /// A maturity label could not be parsed.
    #[error("Invalid maturity label '{label}': {reason}")]
    InvalidMaturity {
        /// The raw label.
        label: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Error in date parsing or an invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },
}

impl CoreError {
    /// Creates a schema error.
    #[must_use]
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Creates an empty dataset error.
    #[must_use]
    pub fn empty_dataset(reason: impl Into<String>) -> Self {
        Self::EmptyDataset {
            reason: reason.into(),
        }
    }

    /// Creates an unknown maturity error.
    #[must_use]
    pub fn unknown_maturity(maturity: Maturity) -> Self {
        Self::UnknownMaturity { maturity }
    }

    /// Creates an invalid maturity label error.
    #[must_use]
    pub fn invalid_maturity(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMaturity {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_unknown_maturity_display() {
        let err = CoreError::unknown_maturity(Maturity::Y30);
        assert_eq!(
            err.to_string(),
            "Unknown maturity: 30Y is not in the curve schema"
        );
    }
}
