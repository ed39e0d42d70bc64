//! The append-only CSV dataset store.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use humboldt_series::sort_dedup;
use humboldt_types::{HumboldtError, Result, SeriesRow, format_timestamp};
use tracing::debug;

/// A persisted, timestamp-keyed flat table of one row type.
///
/// The store exclusively owns the canonical on-disk table: one header
/// row, ascending millisecond-epoch timestamps, one row per timestamp.
/// Rows are never deleted; growth happens through [`CsvStore::append`],
/// which rewrites the whole table atomically.
#[derive(Debug, Clone)]
pub struct CsvStore<R> {
    path: PathBuf,
    _row: PhantomData<R>,
}

impl<R: SeriesRow> CsvStore<R> {
    /// Creates a store handle for the given file path.
    ///
    /// The file is not touched until the first read or append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _row: PhantomData,
        }
    }

    /// Returns the path of the persisted table.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full persisted table, empty if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::Io`] on read failure and
    /// [`HumboldtError::Store`] if the header or any row does not match
    /// the column layout.
    pub fn read(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        parse_table(&content)
    }

    /// Returns the newest persisted timestamp, `None` when empty.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::read`].
    pub fn last_timestamp(&self) -> Result<Option<i64>> {
        Ok(self.read()?.last().map(SeriesRow::timestamp_ms))
    }

    /// Merges new rows into the persisted table.
    ///
    /// Union of existing and incoming rows, deduplicated by timestamp
    /// with incoming rows winning, sorted ascending, then the whole table
    /// is rewritten atomically (write to a temporary file in the same
    /// directory, then rename). Returns the net number of rows added.
    ///
    /// Appending the same rows twice is a no-op the second time.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::read`], plus write failures.
    pub fn append(&self, rows: Vec<R>) -> Result<usize> {
        let mut table = self.read()?;
        let before = table.len();
        table.extend(rows);
        let table = sort_dedup(table);
        let added = table.len() - before;

        write_rows(&self.path, &table)?;
        debug!(path = %self.path.display(), added, total = table.len(), "table rewritten");
        Ok(added)
    }

    /// Reads the rows with `start_ms <= timestamp <= end_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::EmptyRange`] when no rows match, plus the
    /// failure modes of [`Self::read`].
    pub fn range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<R>> {
        let rows: Vec<R> = self
            .read()?
            .into_iter()
            .filter(|row| row.timestamp_ms() >= start_ms && row.timestamp_ms() <= end_ms)
            .collect();
        if rows.is_empty() {
            return Err(HumboldtError::EmptyRange {
                start: format_timestamp(start_ms).unwrap_or_else(|_| start_ms.to_string()),
                end: format_timestamp(end_ms).unwrap_or_else(|_| end_ms.to_string()),
            });
        }
        Ok(rows)
    }
}

/// Parses a persisted table, validating the header.
fn parse_table<R: SeriesRow>(content: &str) -> Result<Vec<R>> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| HumboldtError::Store("table has no header row".to_string()))?;
    let expected = R::COLUMNS.join(",");
    if header != expected {
        return Err(HumboldtError::Store(format!(
            "header mismatch: expected '{expected}', found '{header}'"
        )));
    }

    lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            R::from_fields(&fields)
        })
        .collect()
}

/// Writes a table (header plus rows) atomically to the given path.
///
/// The rows are written to a temporary file in the destination directory
/// and renamed into place, so a crash never leaves a half-written table.
///
/// # Errors
///
/// Returns [`HumboldtError::Io`] on any write or rename failure.
pub fn write_rows<R: SeriesRow>(path: &Path, rows: &[R]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    {
        let mut writer = std::io::BufWriter::new(tmp.as_file_mut());
        writeln!(writer, "{}", R::COLUMNS.join(","))?;
        for row in rows {
            writeln!(writer, "{}", row.to_fields().join(","))?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| HumboldtError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use humboldt_types::OpenInterest;

    fn oi(timestamp_ms: i64, open_interest: f64) -> OpenInterest {
        OpenInterest {
            timestamp_ms,
            open_interest,
        }
    }

    fn store_in(dir: &Path) -> CsvStore<OpenInterest> {
        CsvStore::new(dir.join("open_interest_BTCUSDT.csv"))
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.read().unwrap().is_empty());
        assert_eq!(store.last_timestamp().unwrap(), None);
    }

    #[test]
    fn test_append_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let added = store.append(vec![oi(2000, 2.0), oi(1000, 1.0)]).unwrap();
        assert_eq!(added, 2);

        let rows = store.read().unwrap();
        assert_eq!(rows, vec![oi(1000, 1.0), oi(2000, 2.0)]);
        assert_eq!(store.last_timestamp().unwrap(), Some(2000));
    }

    #[test]
    fn test_append_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.append(vec![oi(1000, 1.0), oi(2000, 2.0)]).unwrap();
        let added = store.append(vec![oi(1000, 1.0), oi(2000, 2.0)]).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.read().unwrap().len(), 2);
    }

    #[test]
    fn test_append_overlap_keeps_incoming() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.append(vec![oi(1000, 1.0)]).unwrap();
        store.append(vec![oi(1000, 9.0), oi(2000, 2.0)]).unwrap();

        let rows = store.read().unwrap();
        assert_eq!(rows, vec![oi(1000, 9.0), oi(2000, 2.0)]);
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .append(vec![oi(1000, 1.0), oi(2000, 2.0), oi(3000, 3.0)])
            .unwrap();

        let rows = store.range(1000, 2000).unwrap();
        assert_eq!(rows, vec![oi(1000, 1.0), oi(2000, 2.0)]);
    }

    #[test]
    fn test_range_empty_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.append(vec![oi(1000, 1.0)]).unwrap();

        assert!(matches!(
            store.range(5000, 6000),
            Err(HumboldtError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_header_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("open_interest_BTCUSDT.csv");
        std::fs::write(&path, "timestamp,something_else\n1000,1.0\n").unwrap();

        let store: CsvStore<OpenInterest> = CsvStore::new(&path);
        assert!(matches!(store.read(), Err(HumboldtError::Store(_))));
    }

    #[test]
    fn test_persisted_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.append(vec![oi(1000, 1.5)]).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "timestamp,open_interest\n1000,1.5\n");
    }
}
