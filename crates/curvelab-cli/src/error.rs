//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// `--from` after `--to`.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Start of the range.
        from: String,
        /// End of the range.
        to: String,
    },

    /// Invalid maturity label.
    #[error("Invalid maturity: {0}. Use labels like 3M, 2Y or 10Y.")]
    InvalidMaturity(String),

    /// No curve file given on the command line or in the configuration.
    #[error("No curve data: pass --data <csv> or set data.curve_csv in the configuration")]
    MissingData,

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// The requested date is not in the curve table.
    #[error("No curve observation on {0}")]
    DateNotFound(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
