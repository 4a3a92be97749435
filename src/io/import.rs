//! CSV series import: reads `x,y` rows into abscissa/ordinate pairs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::SeriesError;

/// One row of an input series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeriesRecord {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

/// Reads a series from a CSV file with an `x,y` header.
///
/// # Errors
///
/// Returns a `SeriesError` if the file cannot be opened, a row does not
/// decode, or there are no rows.
pub fn load_series(path: &Path) -> Result<Vec<(f64, f64)>, SeriesError> {
    let file = File::open(path).map_err(|source| SeriesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_series(file)
}

/// Reads a series from any CSV source with an `x,y` header.
///
/// Extra columns are ignored; surrounding whitespace is trimmed. Rows keep
/// their file order; sorting and duplicate handling belong to the engine.
///
/// # Errors
///
/// Returns a `SeriesError` if a row does not decode or there are no rows.
pub fn read_series(reader: impl Read) -> Result<Vec<(f64, f64)>, SeriesError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series = Vec::new();
    for record in rdr.deserialize::<SeriesRecord>() {
        let record = record?;
        series.push((record.x, record.y));
    }

    if series.is_empty() {
        return Err(SeriesError::Empty);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_file_order() {
        let csv = "x,y\n2,20\n1, 10\n3,30.5\n";
        let series = read_series(csv.as_bytes()).expect("series should parse");
        assert_eq!(series, vec![(2.0, 20.0), (1.0, 10.0), (3.0, 30.5)]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "x,y,label\n0,1,a\n1,2,b\n";
        let series = read_series(csv.as_bytes()).expect("extra columns should parse");
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn header_only_is_empty() {
        let result = read_series("x,y\n".as_bytes());
        assert!(matches!(result, Err(SeriesError::Empty)));
    }

    #[test]
    fn malformed_value_is_a_csv_error() {
        let result = read_series("x,y\n1,abc\n".as_bytes());
        assert!(matches!(result, Err(SeriesError::Csv(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_series(Path::new("does/not/exist.csv")).expect_err("file is missing");
        let message = err.to_string();
        assert!(message.contains("does/not/exist.csv"), "{message}");
    }
}
