//! Error types for the sensor-table crate.

use thiserror::Error;

/// Errors that can occur while aggregating sensor readings.
#[derive(Error, Debug)]
pub enum SensorTableError {
    /// No compressed readings were found under the given root.
    #[error("no .csv.gz files found under {0}")]
    NoFilesFound(String),

    /// Filesystem error while discovering or reading files.
    #[error("failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// A source file could not be parsed as CSV.
    #[error("failed to parse {file}: {source}")]
    CsvParse {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A source file is missing a required column.
    #[error("missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// A timestamp cell could not be interpreted.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] enviro_common::TimeParseError),

    /// A row has no timestamp and no preceding row to fill from.
    #[error("row {row} has no timestamp and no preceding value to forward-fill from")]
    MissingTimestamp { row: usize },
}

/// Result type for sensor-table operations.
pub type Result<T> = std::result::Result<T, SensorTableError>;
