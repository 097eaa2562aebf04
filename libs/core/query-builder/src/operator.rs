use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

use crate::error::{QueryError, QueryResult};

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    /// Parse an operator token such as `lt`, `LTE` or `$gte`.
    pub fn parse_token(token: &str) -> QueryResult<Self> {
        let trimmed = token.trim();
        trimmed
            .strip_prefix('$')
            .unwrap_or(trimmed)
            .parse()
            .map_err(|_| QueryError::UnsupportedOperator(token.to_string()))
    }

    /// Whether a field value ordered `ordering` against the operand satisfies the operator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
        }
    }

    /// Operator name in the document-store query language.
    pub fn driver_token(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
        }
    }
}

/// How several conditions are composed.
///
/// `None` means the caller did not choose; it composes like [`Combinator::And`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Combinator {
    And,
    Or,
    Nor,
    #[default]
    None,
}

impl Combinator {
    /// Parse a combinator token such as `or`, `AND` or `$nor`. An empty token is `None`.
    ///
    /// `none` itself is not a client token: leaving the combinator out is the only
    /// way to get the default.
    pub fn parse_token(token: &str) -> QueryResult<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Ok(Combinator::None);
        }
        match trimmed.strip_prefix('$').unwrap_or(trimmed).parse() {
            Ok(Combinator::None) | Err(_) => {
                Err(QueryError::UnsupportedCombinator(token.to_string()))
            }
            Ok(combinator) => Ok(combinator),
        }
    }
}
