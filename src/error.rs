//! Error types for the employee directory.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the data service and its ambient stack can report.

use thiserror::Error;

/// The main error type for the employee directory.
///
/// Business-rule violations (`InvalidFormat`, `DuplicateEmail`, `NotFound`,
/// `InvalidDateFormat`) are distinct variants so the HTTP boundary can turn
/// them into user-readable messages. Everything else is reported generically.
///
/// # Example
///
/// ```
/// use employee_directory::error::DirectoryError;
///
/// let error = DirectoryError::NotFound { id: 42 };
/// assert_eq!(error.to_string(), "Employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A field failed its schema constraint (malformed email, non-numeric
    /// salary, length out of bounds, ...).
    #[error("Invalid value for '{field}': {message}")]
    InvalidFormat {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Another employee already uses this email address.
    #[error("Employee with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting email address.
        email: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date format '{value}'. Please use YYYY-MM-DD.")]
    InvalidDateFormat {
        /// The rejected input.
        value: String,
    },

    /// The record store failed; the surrounding transaction was rolled back.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] sqlx::Error),

    /// The embedded schema migrations could not be applied.
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An uploaded profile picture could not be stored.
    #[error("Failed to store upload '{filename}': {message}")]
    UploadFailed {
        /// The sanitized filename being written.
        filename: String,
        /// A description of the I/O failure.
        message: String,
    },
}

impl DirectoryError {
    /// Shorthand for an [`DirectoryError::InvalidFormat`] error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for failures caused by the caller's input rather than
    /// by the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. }
                | Self::DuplicateEmail { .. }
                | Self::NotFound { .. }
                | Self::InvalidDateFormat { .. }
        )
    }
}

/// A type alias for Results that return DirectoryError.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
