//! CSV input and output for observation series.

use std::io;

use thiserror::Error;

/// Series export.
pub mod export;
/// Series import.
pub mod import;

/// Failure while reading or writing a series.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The underlying file could not be opened or written.
    #[error("cannot access \"{path}\": {source}")]
    Io {
        /// Offending path.
        path: String,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// A record could not be decoded or encoded.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The input held no data rows.
    #[error("series is empty")]
    Empty,
}
