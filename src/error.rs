//! Unified error types for chatsieve.
//!
//! This module provides a single [`SieveError`] enum that covers all error
//! cases in the library. Most pipeline faults are recovered internally
//! (a malformed pattern degrades to "never matches", an unknown registry
//! key falls back to the default option); the variants here surface only
//! at the edges where a caller explicitly asks for validation or I/O.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatsieve operations.
///
/// # Example
///
/// ```rust
/// use chatsieve::error::Result;
/// use chatsieve::Filter;
///
/// fn my_function() -> Result<Vec<Filter>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, SieveError>;

/// The error type for all chatsieve operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SieveError {
    /// An I/O error occurred.
    ///
    /// This typically happens when a filter-set file doesn't exist or
    /// cannot be read.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// This can occur when reading or writing persisted filter sets.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A find string failed to compile as a search pattern.
    ///
    /// The engine never raises this during evaluation — a filter with a
    /// malformed pattern simply never matches. It is returned by
    /// [`search::compile`](crate::search::compile) for callers that want
    /// to validate user input up front.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern string that failed to compile
        pattern: String,
        /// The underlying compile error
        #[source]
        source: Box<regex::Error>,
    },

    /// A color string could not be parsed.
    ///
    /// Colors persist as `#rrggbb` or `#rrggbbaa` hex strings.
    #[error("Invalid color '{input}'. Expected format: {expected}")]
    InvalidColor {
        /// The invalid color string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A persisted filter record was structurally unusable.
    ///
    /// Individual bad fields are forgiven during load; this fires only
    /// when the record as a whole is not an object/array where one is
    /// required.
    #[error("Invalid filter record: {message}")]
    InvalidFilter {
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SieveError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        SieveError::InvalidPattern {
            pattern: pattern.into(),
            source: Box::new(source),
        }
    }

    /// Creates an invalid color error.
    pub fn invalid_color(input: impl Into<String>) -> Self {
        SieveError::InvalidColor {
            input: input.into(),
            expected: "#rrggbb or #rrggbbaa",
        }
    }

    /// Creates an invalid filter record error.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        SieveError::InvalidFilter {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, SieveError::Io(_))
    }

    /// Returns `true` if this is a JSON error.
    pub fn is_json(&self) -> bool {
        matches!(self, SieveError::Json(_))
    }

    /// Returns `true` if this is a pattern error.
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, SieveError::InvalidPattern { .. })
    }

    /// Returns `true` if this is a color error.
    pub fn is_invalid_color(&self) -> bool {
        matches!(self, SieveError::InvalidColor { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = SieveError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SieveError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = SieveError::invalid_pattern("(", source);
        let display = err.to_string();
        assert!(display.contains("Invalid pattern"));
        assert!(display.contains('('));
    }

    #[test]
    fn test_invalid_color_display() {
        let err = SieveError::invalid_color("not-a-color");
        let display = err.to_string();
        assert!(display.contains("not-a-color"));
        assert!(display.contains("#rrggbb"));
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = SieveError::invalid_filter("expected an object");
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = SieveError::from(io_err);
        assert!(err.source().is_some());

        let source = regex::Regex::new("[").unwrap_err();
        let err = SieveError::invalid_pattern("[", source);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods() {
        let io_err = SieveError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_json());
        assert!(!io_err.is_invalid_pattern());

        let color_err = SieveError::invalid_color("bad");
        assert!(color_err.is_invalid_color());
        assert!(!color_err.is_io());

        let pattern_err = SieveError::invalid_pattern("(", regex::Regex::new("(").unwrap_err());
        assert!(pattern_err.is_invalid_pattern());
        assert!(!pattern_err.is_invalid_color());
    }

    #[test]
    fn test_error_debug() {
        let err = SieveError::invalid_color("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidColor"));
    }
}
