//! Error types for the transaction summary pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for summary operations
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Errors that can occur while producing a summary.
///
/// Row-level data problems (bad dates, bad amounts, short rows) are never
/// reported here; the engine skips those rows.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The input could not be opened or read
    #[error("cannot read transactions from {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text could not be parsed at all
    #[error("malformed CSV input: {0}")]
    MalformedInput(#[from] csv::Error),

    /// I/O error outside of reading the input (report output, outbox directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The summary email could not be built
    #[error("cannot build email: {0}")]
    Email(#[from] lettre::error::Error),

    /// The summary email could not be queued
    #[error("cannot queue email: {0}")]
    MailTransport(#[from] lettre::transport::file::Error),

    /// A persisted amount is not a decimal anymore
    #[error("stored transaction {id} has invalid amount {value:?}")]
    InvalidStoredAmount { id: i64, value: String },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: txn-summary <transactions.csv>")]
    MissingArgument,
}
