//! Report persistence
//!
//! One CSV file per run: a title row, then one `[rating, text]` row per
//! review. Reports are written whole and committed atomically.

mod csv_writer;

pub use csv_writer::write_report;

use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
