//! Error types for timetable-engine operations.

use thiserror::Error;

/// Errors raised while loading a dataset or building an engine.
///
/// Query-time conditions (unparseable session ranges, unknown class codes,
/// unknown building filters) are not errors: they are folded into the query
/// results.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset was not valid JSON.
    #[error("Dataset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset was valid JSON but did not match the timetable schema.
    #[error("Invalid dataset: {0}")]
    Dataset(String),

    /// The configured civil timezone is not a valid IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Convenience alias used throughout timetable-engine.
pub type Result<T> = std::result::Result<T, TimetableError>;
