//! All error types for the string-resolver crate.
//!
//! Every inconsistency found while merging or diffing is fatal: these are
//! returned from the failing call and the caller is expected to abort the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("validation error: {0}")]
    Validation(String),

    /// A value gate that cannot be parsed. This fails the merge instead of
    /// treating the gate as never matching.
    #[error("invalid version range `{range}`: {reason}")]
    InvalidVersionRange { range: String, reason: String },

    #[error("Conflicting key {key} ({language}) in {title} and {existing_title}")]
    Conflict {
        key: String,
        language: String,
        title: String,
        existing_title: String,
    },

    #[error("Duplicate key {key} ({language}) in {title}")]
    DuplicateKey {
        key: String,
        language: String,
        title: String,
    },

    #[error("{key} is missing a value in the base culture ({culture})")]
    MissingBaseValue { key: String, culture: String },

    #[error("value of {key} in {title} does not match its declared type `{expected}`")]
    TypeMismatch {
        key: String,
        expected: String,
        title: String,
    },
}

impl Error {
    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Returns true for the two errors raised when a `(key, language)` slot is
    /// filled twice.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. } | Error::DuplicateKey { .. })
    }
}
