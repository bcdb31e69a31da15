use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Expected column '{0}' is missing")]
    MissingColumn(String),

    #[error("Cannot cast '{value}' in column '{column}' (row {row})")]
    Cast {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
