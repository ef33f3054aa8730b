//! Error types for Fintrack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid granularity: {0} (valid: weekly, monthly, yearly)")]
    InvalidGranularity(String),

    #[error("Invalid view: {0} (valid: overall, income, expenses)")]
    InvalidView(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// One or more granularities could not be invalidated.
    /// `first` carries the detail of the first failure encountered.
    #[error("Summary invalidation failed for {failed} granularity(ies): {first}")]
    PartialInvalidation { failed: usize, first: String },

    #[error("Advice error: {0}")]
    Advice(String),

    #[error("Advice backend not configured")]
    AdviceUnavailable,
}

impl Error {
    /// True when the error is a SQLite UNIQUE constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
