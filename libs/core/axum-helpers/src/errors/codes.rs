//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Input decoded fine but breaks a domain rule
    ValidationError,

    /// Path id is not a positive integer, or missing
    InvalidId,

    /// Request body is empty, malformed or has unexpected fields
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// Catch-all for other malformed requests
    BadRequest,

    /// Route exists but not for this method
    MethodNotAllowed,

    /// Request body exceeds the size limit
    PayloadTooLarge,

    /// Request body did not arrive within the read timeout
    RequestTimeout,

    // Server errors
    /// An unexpected internal server error occurred
    InternalError,

    /// A dependency (the database) is unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Storage failed while serving the request
    DatabaseError,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
    /// assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// - 1000-1999: Client errors and generic server errors
    /// - 2000-2999: Database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1006,
            Self::MethodNotAllowed => 1007,
            Self::PayloadTooLarge => 1008,
            Self::RequestTimeout => 1009,
            Self::ServiceUnavailable => 1011,
            Self::DatabaseError => 2003,
        }
    }

    /// Get the default user-facing error message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid item ID format",
            Self::InvalidJson => "Request body contains badly-formed JSON",
            Self::NotFound => "Not Found",
            Self::BadRequest => "Bad Request",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::PayloadTooLarge => "Request body must not be larger than 1MB",
            Self::RequestTimeout => "Request Timeout",
            Self::InternalError | Self::DatabaseError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
