//! Error types for the I/O boundary.

use thiserror::Error;

/// Result type for fallible point-file and store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing point files and stored state.
///
/// The grouping, offset and interval operations never fail; they correct
/// or filter their input instead.
#[derive(Error, Debug)]
pub enum Error {
    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader or record failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV header row lacks the columns needed to build a point
    #[error("CSV is missing required columns (found headers: {found:?}); need latitude and longitude")]
    MissingColumns { found: Vec<String> },

    /// Input held no usable rows
    #[error("No valid points found ({skipped} rows skipped)")]
    NoRows { skipped: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
