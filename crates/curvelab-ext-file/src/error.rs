//! Error types for file-based sources.

use std::path::PathBuf;

use curvelab_core::CoreError;
use thiserror::Error;

/// Error type for file sources.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be opened or read.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("CSV error in {path}: {message}")]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A required column is not in the header.
    #[error("{path}: missing required column '{column}'")]
    MissingColumn {
        /// File involved.
        path: PathBuf,
        /// Expected column.
        column: String,
    },

    /// The rows did not form a valid curve table.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl FileError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error.
    pub fn csv(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for file sources.
pub type FileResult<T> = Result<T, FileError>;
