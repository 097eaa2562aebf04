use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use query_builder::QueryError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidQueryValue { field: String, value: String },

    /// Any other rejected query: combinator, sort direction, projection
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error("Store error: {0}")]
    Store(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<QueryError> for ProductError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::UnknownField(field) => ProductError::UnknownField(field),
            QueryError::UnsupportedOperator(operator) => ProductError::UnsupportedOperator(operator),
            QueryError::InvalidQueryValue { field, value } => {
                ProductError::InvalidQueryValue { field, value }
            }
            QueryError::Serialization(msg) => ProductError::Store(msg),
            other => ProductError::InvalidQuery(other.to_string()),
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::UnknownField(_) => AppError::InvalidQuery {
                code: ErrorCode::UnknownField,
                message,
            },
            ProductError::UnsupportedOperator(_) => AppError::InvalidQuery {
                code: ErrorCode::UnsupportedOperator,
                message,
            },
            ProductError::InvalidQueryValue { .. } => AppError::InvalidQuery {
                code: ErrorCode::InvalidQueryValue,
                message,
            },
            ProductError::InvalidQuery(msg) => AppError::InvalidQuery {
                code: ErrorCode::InvalidQuery,
                message: msg,
            },
            ProductError::NotFound(_) => AppError::NotFound(message),
            ProductError::Store(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Store(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for ProductError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        ProductError::Store(format!("Failed to decode product: {}", err))
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Store(format!("Failed to encode product: {}", err))
    }
}
