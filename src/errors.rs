//! Unified error types for the billing backend.
//!
//! One error enum covers the whole taxonomy: request validation (collected into
//! exhaustive message lists rather than failing on the first problem), missing
//! tenant data, database/transaction failures, and renderer failures.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing request fields on a write endpoint.
    /// All problems found are collected before this is returned.
    #[error("Invalid data format: {}", .errors.join("; "))]
    Validation {
        /// Every validation message found, in field order
        errors: Vec<String>,
    },

    /// Malformed report request (bad format, bad dates, bad business id).
    /// Kept separate from [`Error::Validation`] because the report endpoint
    /// reports its errors under a different response envelope.
    #[error("Report validation failed: {}", .errors.join("; "))]
    ReportValidation {
        /// Every validation message found
        errors: Vec<String>,
    },

    /// A referenced entity (business, user, invoice) does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable entity name, e.g. `"Business"`
        entity: &'static str,
    },

    /// No free invoice number was found within the retry budget.
    #[error("could not allocate a unique invoice number after {attempts} attempts")]
    InvoiceNumberExhausted {
        /// How many candidates were generated and rejected
        attempts: u32,
    },

    /// The business id is too long to leave room for a random suffix.
    #[error("business id {business_id} is too long for a {max_len}-character invoice number")]
    InvoiceNumberOverflow {
        /// Offending business id
        business_id: i64,
        /// Maximum total invoice number length
        max_len: usize,
    },

    /// Failure inside a format encoder. Partial output is never returned.
    #[error("Render error: {0}")]
    Render(String),

    /// Missing or unusable application configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was misconfigured
        message: String,
    },

    /// Database error, including transaction begin/commit/rollback failures.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Error::Render(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::Render(value.to_string())
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
