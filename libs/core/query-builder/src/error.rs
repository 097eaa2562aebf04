use thiserror::Error;

/// Errors raised while turning raw criteria into a [`ResourceQuery`](crate::ResourceQuery).
///
/// All of them are client errors: nothing reaches the data store when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidQueryValue { field: String, value: String },

    #[error("Unsupported combinator '{0}'")]
    UnsupportedCombinator(String),

    #[error("Invalid sort direction '{0}'")]
    InvalidSortDirection(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
