//! Error types and handling infrastructure for pathproxy.
//!
//! This module provides a centralized error type using `thiserror`. Failures
//! raised by an underlying handle travel through unchanged as
//! [`ProxyError::Io`], so callers can still inspect the original
//! [`std::io::ErrorKind`] and OS error code.

use thiserror::Error;

/// The main error type for pathproxy operations.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Registration was attempted with something that is not a live handle,
    /// or with an identifier that cannot be used.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No registry entry exists for the identifier extracted from a path
    #[error("No resource registered under identifier: {identifier}")]
    NotFound { identifier: String },

    /// The host scheme table has no wrapper for the path's scheme
    #[error("No stream wrapper installed for path: {path}")]
    UnknownScheme { path: String },

    /// Failure reported by the underlying handle or host filesystem primitive
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Standard Result type for pathproxy operations.
pub type Result<T> = std::result::Result<T, ProxyError>;

impl ProxyError {
    /// Create an InvalidInput error with a descriptive message
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a NotFound error for the given identifier
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create an UnknownScheme error for the given path
    pub fn unknown_scheme(path: impl Into<String>) -> Self {
        Self::UnknownScheme { path: path.into() }
    }

    /// True when the error is a registry miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let not_found = ProxyError::not_found("foo");
        assert_eq!(
            not_found.to_string(),
            "No resource registered under identifier: foo"
        );

        let invalid = ProxyError::invalid_input("handle is closed");
        assert_eq!(invalid.to_string(), "Invalid input: handle is closed");

        let scheme = ProxyError::unknown_scheme("ftp://x");
        assert_eq!(
            scheme.to_string(),
            "No stream wrapper installed for path: ftp://x"
        );
    }

    #[test]
    fn test_io_error_is_not_translated() {
        let io_err = std::io::Error::from_raw_os_error(9);
        let raw = io_err.raw_os_error();
        let message = io_err.to_string();

        let err: ProxyError = io_err.into();
        assert_eq!(err.to_string(), message);
        match err {
            ProxyError::Io(inner) => assert_eq!(inner.raw_os_error(), raw),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProxyError::not_found("x").is_not_found());
        assert!(!ProxyError::invalid_input("x").is_not_found());
    }
}
