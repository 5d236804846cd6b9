//! # CurveLab Ext File
//!
//! File-based curve and macro data for CurveLab.
//!
//! This crate turns files on disk into the inputs the analytics expect:
//! - CSV zero-coupon curve source (GSW layout, optional preamble)
//! - Directory of FRED-style macro CSVs
//! - Empty macro source for sessions without macro data
//!
//! Downloading the files is out of scope; point the sources at local copies.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod curve_data;
mod error;
mod macro_data;

pub use curve_data::*;
pub use error::{FileError, FileResult};
pub use macro_data::*;

use std::path::Path;

use curvelab_core::CurveTable;

/// Loads a curve table from a CSV file.
pub fn load_curve_csv(path: impl AsRef<Path>, skip_lines: usize) -> FileResult<CurveTable> {
    CsvCurveSource::new(path)
        .with_skip_lines(skip_lines)
        .load_table()
}

/// Creates a macro source over `dir`, or an empty source when no directory
/// is configured.
pub fn create_macro_source(dir: Option<&Path>) -> Box<dyn MacroSource> {
    match dir {
        Some(dir) => Box::new(CsvMacroSource::new(dir)),
        None => Box::new(EmptyMacroSource),
    }
}
