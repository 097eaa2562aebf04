//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//! - HTTP status it is rendered with
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

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Bad request not covered by a more specific code
    BadRequest,

    /// HTTP method not allowed for the route
    MethodNotAllowed,

    // Query errors (1100-1199)
    /// Filter, sort or projection names a field the resource does not have
    UnknownField,

    /// Comparison operator is not supported
    UnsupportedOperator,

    /// Comparison value cannot be coerced to the field type
    InvalidQueryValue,

    /// Combinator, sort direction or projection is malformed
    InvalidQuery,

    // Server errors (1500-1599)
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Data store errors (2000-2999)
    /// The data store rejected or failed an operation
    DatabaseError,

    // JSON errors (5000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier clients can match on.
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
    /// assert_eq!(ErrorCode::UnknownField.as_str(), "UNKNOWN_FIELD");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::UnknownField => "UNKNOWN_FIELD",
            Self::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            Self::InvalidQueryValue => "INVALID_QUERY_VALUE",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for structured logs and metrics.
    ///
    /// Ranges:
    /// - 1000-1099: Client errors
    /// - 1100-1199: Query errors
    /// - 1500-1599: Server errors
    /// - 2000-2999: Data store errors
    /// - 5000-5999: Serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::MethodNotAllowed => 1006,

            Self::UnknownField => 1101,
            Self::UnsupportedOperator => 1102,
            Self::InvalidQueryValue => 1103,
            Self::InvalidQuery => 1104,

            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,

            Self::DatabaseError => 2001,

            Self::SerdeJsonError => 5001,
        }
    }

    /// Default user-facing message. Handlers may override it with specifics.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::UnknownField => "Unknown field",
            Self::UnsupportedOperator => "Unsupported operator",
            Self::InvalidQueryValue => "Invalid query value",
            Self::InvalidQuery => "Invalid query",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "An internal server error occurred",
            Self::SerdeJsonError => "An internal server error occurred",
        }
    }

    /// HTTP status the code is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::InvalidUuid
            | Self::JsonExtraction
            | Self::BadRequest
            | Self::UnknownField
            | Self::UnsupportedOperator
            | Self::InvalidQueryValue
            | Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError | Self::DatabaseError | Self::SerdeJsonError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
