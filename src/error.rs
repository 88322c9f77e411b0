//! Error taxonomy for csvtool.
//!
//! Every failure is fatal to the run. [`ErrorClass`] groups the variants by
//! when they can occur: configuration errors before any row is read,
//! resolution errors right after the header, projection errors per row.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvToolError {
    #[error("malformed range term '{term}': {reason}")]
    MalformedRange { term: String, reason: String },

    #[error("there are {got} new names but {expected} columns")]
    RenameLengthMismatch { expected: usize, got: usize },

    #[error("named mode requires a header row but the input is empty")]
    HeaderRequired,

    #[error("invalid column index '{0}' (expected a non-negative integer)")]
    InvalidColumnIndex(String),

    #[error("no columns selected")]
    NoColumns,

    #[error("invalid dialect: {0}")]
    InvalidDialect(String),

    #[error("CSV header does not contain column \"{name}\" (missing: {})", format_missing(.missing))]
    UnknownColumn { name: String, missing: Vec<String> },

    #[error("row {row}: column {position} is out of range for a row of {width} fields")]
    RowProjection {
        row: usize,
        position: usize,
        width: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Broad category of a [`CsvToolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Detected before any row is processed.
    Configuration,
    /// Detected after the header row has been read.
    Resolution,
    /// A data row is narrower than a selected column position.
    RowProjection,
    /// Reading or writing the underlying streams failed.
    Io,
}

impl CsvToolError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CsvToolError::MalformedRange { .. }
            | CsvToolError::RenameLengthMismatch { .. }
            | CsvToolError::HeaderRequired
            | CsvToolError::InvalidColumnIndex(_)
            | CsvToolError::NoColumns
            | CsvToolError::InvalidDialect(_) => ErrorClass::Configuration,
            CsvToolError::UnknownColumn { .. } => ErrorClass::Resolution,
            CsvToolError::RowProjection { .. } => ErrorClass::RowProjection,
            CsvToolError::Io(_) | CsvToolError::Csv(_) => ErrorClass::Io,
        }
    }

    /// True when the error is a write to a reader that went away (`| head`).
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            CsvToolError::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            CsvToolError::Csv(e) => match e.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::BrokenPipe,
                _ => false,
            },
            _ => false,
        }
    }
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("\"{m}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CsvToolError>;
