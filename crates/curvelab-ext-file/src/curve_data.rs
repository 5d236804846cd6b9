//! File-based yield curve sources.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use curvelab_core::{CurveTable, Date, Maturity, RawRow};

use crate::error::{FileError, FileResult};

/// Header names accepted for the date column, compared case-insensitively.
const DATE_COLUMNS: [&str; 3] = ["date", "asofdate", "as_of_date"];

/// Cell spellings read as a missing yield.
const MISSING_MARKERS: [&str; 4] = ["", "na", "nan", "."];

/// A source of curve tables.
pub trait CurveSource {
    /// Short description for logs and messages.
    fn describe(&self) -> String;

    /// Loads and validates the full table.
    fn load_table(&self) -> FileResult<CurveTable>;
}

// =============================================================================
// CSV CURVE SOURCE
// =============================================================================

/// Zero-coupon curve CSV in the Federal Reserve GSW layout.
///
/// The header holds a date column plus one column per maturity. Columns
/// named like `2y`, `10Y` or `6M` are used as-is; raw `SVENYnn` columns
/// become `nnY`. Every other column (parameters, forward rates) is ignored.
#[derive(Debug, Clone)]
pub struct CsvCurveSource {
    file_path: PathBuf,
    skip_lines: usize,
}

impl CsvCurveSource {
    /// Creates a source with no preamble.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            skip_lines: 0,
        }
    }

    /// Skips `lines` preamble lines before the header. The published GSW
    /// file carries 9.
    #[must_use]
    pub fn with_skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Reads the file into raw rows without validating the table.
    ///
    /// Rows whose date cannot be parsed are dropped and reported once.
    pub fn read_rows(&self) -> FileResult<Vec<RawRow>> {
        let path = &self.file_path;
        let file = File::open(path).map_err(|e| FileError::io(path, e))?;
        let mut input = BufReader::new(file);

        let mut discard = String::new();
        for _ in 0..self.skip_lines {
            discard.clear();
            input.read_line(&mut discard).map_err(|e| FileError::io(path, e))?;
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| FileError::csv(path, &e))?
            .clone();

        let date_col = headers
            .iter()
            .position(|h| DATE_COLUMNS.iter().any(|c| h.eq_ignore_ascii_case(c)))
            .ok_or_else(|| FileError::MissingColumn {
                path: path.clone(),
                column: "Date".to_string(),
            })?;

        let maturity_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_col)
            .filter_map(|(i, h)| maturity_label(h).map(|label| (i, label)))
            .collect();

        log::debug!(
            "{}: {} maturity columns of {}",
            path.display(),
            maturity_cols.len(),
            headers.len()
        );

        let mut rows = Vec::new();
        let mut bad_dates = 0usize;
        for result in reader.records() {
            let record = result.map_err(|e| FileError::csv(path, &e))?;

            let Some(date) = record.get(date_col).and_then(|s| Date::parse(s).ok()) else {
                bad_dates += 1;
                continue;
            };

            let mut row = RawRow::new(date);
            for (col, label) in &maturity_cols {
                row.push(label.clone(), record.get(*col).and_then(parse_cell));
            }
            rows.push(row);
        }

        if bad_dates > 0 {
            log::warn!(
                "{}: dropped {} rows with unparseable dates",
                path.display(),
                bad_dates
            );
        }

        Ok(rows)
    }
}

impl CurveSource for CsvCurveSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.file_path.display())
    }

    fn load_table(&self) -> FileResult<CurveTable> {
        let rows = self.read_rows()?;
        let table = CurveTable::load(rows)?;
        log::info!(
            "loaded {} dates x {} maturities from {}",
            table.len(),
            table.maturities().len(),
            self.file_path.display()
        );
        Ok(table)
    }
}

/// Maps a header to a maturity label, `None` for non-maturity columns.
fn maturity_label(header: &str) -> Option<String> {
    let upper = header.to_ascii_uppercase();
    if let Some(years) = upper.strip_prefix("SVENY") {
        return years.parse::<u32>().ok().map(|y| format!("{y}Y"));
    }
    Maturity::parse(header).ok().map(|_| header.to_string())
}

fn parse_cell(cell: &str) -> Option<f64> {
    if MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_maturity_label() {
        assert_eq!(maturity_label("SVENY02").as_deref(), Some("2Y"));
        assert_eq!(maturity_label("SVENY30").as_deref(), Some("30Y"));
        assert_eq!(maturity_label("10y").as_deref(), Some("10y"));
        assert_eq!(maturity_label("SVENF05"), None);
        assert_eq!(maturity_label("BETA0"), None);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("4.25"), Some(4.25));
        assert_eq!(parse_cell("NA"), None);
        assert_eq!(parse_cell("."), None);
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("NaN"), None);
    }

    #[test]
    fn test_gsw_layout_with_preamble() {
        let mut content = String::new();
        for i in 0..9 {
            content.push_str(&format!("preamble line {i}\n"));
        }
        content.push_str("Date,BETA0,SVENY01,SVENY02,SVENY10,SVENF01\n");
        content.push_str("2024-01-03,4.1,4.8,4.3,3.9,4.0\n");
        content.push_str("2024-01-02,4.1,4.7,NA,3.95,4.0\n");
        content.push_str("not-a-date,4.1,4.7,4.3,3.95,4.0\n");
        let file = write_csv(&content);

        let table = CsvCurveSource::new(file.path())
            .with_skip_lines(9)
            .load_table()
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.maturities(),
            &[Maturity::Y1, Maturity::Y2, Maturity::Y10]
        );
        let d = Date::from_ymd(2024, 1, 2).unwrap();
        assert_eq!(table.first_date(), Some(d));
        assert_eq!(table.value_at(d, Maturity::Y2), None);
        assert_eq!(table.value_at(d, Maturity::Y10), Some(3.95));
    }

    #[test]
    fn test_missing_date_column() {
        let file = write_csv("when,2y\n2024-01-02,4.0\n");
        let err = CsvCurveSource::new(file.path()).load_table().unwrap_err();
        assert!(matches!(err, FileError::MissingColumn { ref column, .. } if column == "Date"));
    }

    #[test]
    fn test_duplicate_dates_surface_core_error() {
        let file = write_csv("Date,2y\n2024-01-02,4.0\n2024-01-02,4.1\n");
        let err = CsvCurveSource::new(file.path()).load_table().unwrap_err();
        assert!(matches!(
            err,
            FileError::Core(curvelab_core::CoreError::DateOrder { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvCurveSource::new("/nonexistent/curve.csv")
            .load_table()
            .unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
