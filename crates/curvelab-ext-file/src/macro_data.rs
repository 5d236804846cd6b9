//! File-based macro series sources.

use std::path::{Path, PathBuf};

use curvelab_analytics::macro_join::{MacroObservation, MacroSeries};
use curvelab_core::Date;

use crate::error::{FileError, FileResult};

/// A source of macro series by id.
pub trait MacroSource {
    /// Loads a series, `None` if the source does not carry it.
    fn series(&self, id: &str) -> FileResult<Option<MacroSeries>>;

    /// Ids the source can provide.
    fn available(&self) -> FileResult<Vec<String>>;
}

// =============================================================================
// CSV MACRO SOURCE
// =============================================================================

/// Directory of FRED-style CSV downloads, one `<ID>.csv` per series.
///
/// Each file has a header, a date column and a value column. FRED writes
/// `.` for a missing observation; such rows are skipped.
#[derive(Debug, Clone)]
pub struct CsvMacroSource {
    dir: PathBuf,
}

impl CsvMacroSource {
    /// Creates a source over a directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path a series would be read from.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.csv"))
    }

    fn read_series(&self, id: &str, path: &Path) -> FileResult<MacroSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| FileError::csv(path, &e))?;

        let mut observations = Vec::new();
        let mut skipped = 0usize;
        for result in reader.deserialize() {
            let (date, value): (String, String) = result.map_err(|e| FileError::csv(path, &e))?;
            let parsed = Date::parse(&date)
                .ok()
                .zip(value.parse::<f64>().ok())
                .map(|(date, value)| MacroObservation::new(date, value));
            match parsed {
                Some(obs) => observations.push(obs),
                None => skipped += 1,
            }
        }

        log::debug!(
            "{}: {} observations, {} skipped",
            path.display(),
            observations.len(),
            skipped
        );
        Ok(MacroSeries::new(id, observations))
    }
}

impl MacroSource for CsvMacroSource {
    fn series(&self, id: &str) -> FileResult<Option<MacroSeries>> {
        let path = self.path_for(id);
        if !path.exists() {
            log::debug!("no macro file for {id} at {}", path.display());
            return Ok(None);
        }
        self.read_series(id, &path).map(Some)
    }

    fn available(&self) -> FileResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| FileError::io(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| FileError::io(&self.dir, e))?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem().and_then(|s| s.to_str())) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// EMPTY MACRO SOURCE
// =============================================================================

/// Macro source with no series, for sessions without macro data.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMacroSource;

impl MacroSource for EmptyMacroSource {
    fn series(&self, _id: &str) -> FileResult<Option<MacroSeries>> {
        Ok(None)
    }

    fn available(&self) -> FileResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_fred_csv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("DFF.csv"),
            "observation_date,DFF\n2024-01-01,5.33\n2024-01-02,.\n2024-01-03,5.33\n2024-01-04,5.31\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = CsvMacroSource::new(dir.path());
        let series = source.series("DFF").unwrap().unwrap();
        assert_eq!(series.id, "DFF");
        assert_eq!(series.len(), 3);
        assert_eq!(series.observations()[2].value, 5.31);

        assert!(source.series("GS10").unwrap().is_none());
        assert_eq!(source.available().unwrap(), vec!["DFF".to_string()]);
    }

    #[test]
    fn test_empty_source() {
        assert!(EmptyMacroSource.series("DFF").unwrap().is_none());
        assert!(EmptyMacroSource.available().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let source = CsvMacroSource::new("/nonexistent/macro");
        assert!(source.series("DFF").unwrap().is_none());
        assert!(matches!(source.available(), Err(FileError::Io { .. })));
    }
}
