//! Unified error types for checkin.
//!
//! This module provides a single [`CheckinError`] enum that covers all error
//! cases in the library, from input decoding through report export.
//!
//! # Error Handling Philosophy
//!
//! - **Per-record problems** (a header with an impossible timestamp) are
//!   contained: the extractor logs a [`CheckinError::RecordParse`] and moves on.
//! - **File-level and configuration problems** abort the run with a clear
//!   message.
//! - **Operator mistakes** (missing input file) get their own variant so the
//!   CLI can report them directly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for checkin operations.
///
/// # Example
///
/// ```rust
/// use checkin::error::Result;
/// use checkin::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, CheckinError>;

/// The error type for all checkin operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckinError {
    /// An I/O error occurred.
    ///
    /// Typically permission problems or a full disk when writing the report.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input bytes could not be decoded by any supported scheme.
    #[error("Encoding error: {message}")]
    Encoding {
        /// Description of what failed to decode
        message: String,
    },

    /// A single record header could not be turned into a message.
    ///
    /// The extractor never returns this; it logs it and skips the record.
    #[error("Skipped record '{header}': {reason}")]
    RecordParse {
        /// The header text as it appeared in the log
        header: String,
        /// Why the header was rejected
        reason: String,
    },

    /// Configuration is missing a required field or holds an unusable value.
    #[error("Invalid configuration for '{field}': {message}")]
    Configuration {
        /// The configuration key at fault
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// An input file (chat log or config) does not exist.
    #[error("Input file not found: {}", path.display())]
    MissingInput {
        /// The path that was looked up
        path: PathBuf,
    },

    /// Invalid date given on the command line or in a test fixture.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The configuration file is not valid TOML.
    #[error("Config syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl CheckinError {
    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        CheckinError::Encoding {
            message: message.into(),
        }
    }

    /// Creates a record parse error for the given header text.
    pub fn record_parse(header: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckinError::RecordParse {
            header: header.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(field: &'static str, message: impl Into<String>) -> Self {
        CheckinError::Configuration {
            field,
            message: message.into(),
        }
    }

    /// Creates a missing input error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        CheckinError::MissingInput { path: path.into() }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        CheckinError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, CheckinError::Io(_))
    }

    /// Returns `true` if this is an encoding error.
    pub fn is_encoding(&self) -> bool {
        matches!(self, CheckinError::Encoding { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CheckinError::Configuration { .. } | CheckinError::Toml(_)
        )
    }

    /// Returns `true` if an input file was not found.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, CheckinError::MissingInput { .. })
    }

    /// Returns `true` if this error should stop the whole run.
    ///
    /// Only [`RecordParse`](CheckinError::RecordParse) is recoverable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CheckinError::RecordParse { .. })
    }
}
