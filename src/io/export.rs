//! CSV export of observation series, tagged with their origin.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analog::Observation;

use super::SeriesError;

/// Column header of the observation export.
const HEADER: [&str; 3] = ["x", "y", "origin"];

/// Exports observations to a CSV file at the given path.
///
/// Writes a header row followed by one row per observation, in the order
/// given. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns a `SeriesError` if file creation or writing fails.
pub fn export_csv(observations: &[Observation], path: &Path) -> Result<(), SeriesError> {
    let file = File::create(path).map_err(|source| SeriesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_observations(observations, io::BufWriter::new(file))
}

/// Writes observations as CSV to any writer.
///
/// # Errors
///
/// Returns a `SeriesError` if writing fails.
pub fn write_observations(
    observations: &[Observation],
    writer: impl Write,
) -> Result<(), SeriesError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for o in observations {
        wtr.write_record(&[
            format!("{:.6}", o.x),
            format!("{:.6}", o.y),
            o.origin.as_str().to_string(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
