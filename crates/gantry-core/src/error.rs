//! Error types for Gantry services.
//!
//! This module provides [`ServiceError`], the standard error type carried
//! from binding and handler logic out to the response envelope. The
//! taxonomy is deliberately small:
//!
//! | Variant | Meaning | Wire code |
//! |---|---|---|
//! | `BadParameter` | Caller-fixable binding/validation failure | `BadParameter` |
//! | `Authorization` | Handler denied the call | `AuthorizationError` |
//! | `Data` | Handler-level data fault | `DataError` |
//! | `Fatal` | Unexpected internal fault or misconfiguration | `FatalError` |
//!
//! `BadParameter` messages aggregate every problem found in one request,
//! newline-joined, so a caller can fix everything in a single round trip.
//! Fatal detail never reaches the wire: clients receive a generic notice
//! plus the log key, and the original error is emitted through `tracing`
//! on the server side only.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Standard error type for Gantry services.
///
/// # Example
///
/// ```
/// use gantry_core::ServiceError;
///
/// fn check_access(role: &str) -> Result<(), ServiceError> {
///     if role != "admin" {
///         return Err(ServiceError::authorization("Admin role is required"));
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Aggregated binding/validation failure the caller can fix.
    #[error("{message}")]
    BadParameter {
        /// Every problem found, one per line.
        message: String,
    },

    /// The handler denied the call.
    #[error("{message}")]
    Authorization {
        /// Human-readable denial reason.
        message: String,
    },

    /// A data-level fault declared by handler logic.
    #[error("{message}")]
    Data {
        /// Human-readable error message.
        message: String,
    },

    /// Unexpected internal fault or misconfiguration.
    #[error("{message}")]
    Fatal {
        /// Server-side message (sanitized before reaching clients).
        message: String,
        /// The underlying error, retained for logs only. Not exposed
        /// through `Error::source` since `anyhow::Error` is not itself
        /// a `std::error::Error`; the `Debug` rendering carries it.
        cause: Option<anyhow::Error>,
    },
}

impl ServiceError {
    /// Creates an aggregated bad-parameter error.
    #[must_use]
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        Self::BadParameter {
            message: message.into(),
        }
    }

    /// Creates an authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Creates a data error.
    #[must_use]
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Creates a fatal error.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a fatal error wrapping an underlying cause.
    pub fn fatal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Fatal {
            message: message.into(),
            cause: Some(source.into()),
        }
    }

    /// Returns the machine-readable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadParameter { .. } => "BadParameter",
            Self::Authorization { .. } => "AuthorizationError",
            Self::Data { .. } => "DataError",
            Self::Fatal { .. } => "FatalError",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadParameter { .. } | Self::Data { .. } => StatusCode::BAD_REQUEST,
            Self::Authorization { .. } => StatusCode::UNAUTHORIZED,
            Self::Fatal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message a client is allowed to see.
    ///
    /// Operation errors keep their message and gain the log key line so
    /// callers can quote it when reporting problems. Fatal errors are
    /// replaced entirely by a generic notice; the detail stays in logs.
    #[must_use]
    pub fn client_message(&self, log_key: &str) -> String {
        match self {
            Self::Fatal { .. } => {
                format!("There was a fatal service error.\nThe Log Key for this error is {log_key}")
            }
            other => format!("{other}\nThe Log Key for this error is {log_key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_parameter_error() {
        let error = ServiceError::bad_parameter("Missing required parameter 'Name'");
        assert_eq!(error.code(), "BadParameter");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("Missing required"));
    }

    #[test]
    fn test_authorization_error() {
        let error = ServiceError::authorization("Admin role is required");
        assert_eq!(error.code(), "AuthorizationError");
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_data_error() {
        let error = ServiceError::data("Record is gone");
        assert_eq!(error.code(), "DataError");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fatal_error_is_sanitized() {
        let error = ServiceError::fatal("the database password is hunter2");
        assert_eq!(error.code(), "FatalError");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let visible = error.client_message("LK[20260830_101500_000001]");
        assert!(!visible.contains("hunter2"));
        assert!(visible.contains("There was a fatal service error."));
        assert!(visible.contains("LK[20260830_101500_000001]"));
    }

    #[test]
    fn test_operation_error_keeps_message() {
        let error = ServiceError::bad_parameter("Unknown URI parameter: 'turtle'");
        let visible = error.client_message("LK[1]");
        assert!(visible.starts_with("Unknown URI parameter: 'turtle'\n"));
        assert!(visible.ends_with("The Log Key for this error is LK[1]"));
    }

    #[test]
    fn test_fatal_with_source_keeps_cause_for_logs() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let error = ServiceError::fatal_with_source("storage fault", io);
        assert_eq!(error.to_string(), "storage fault");
        assert!(format!("{error:?}").contains("disk on fire"));
    }
}
