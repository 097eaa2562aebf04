//! Field metadata and typed comparison values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{QueryError, QueryResult};

/// Storage type of a field, used to coerce raw text into a comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Identifier,
    Text,
    Number,
    Timestamp,
}

/// A typed value that a field can be compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Id(Uuid),
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Coerce raw request text into the value type of a field.
    ///
    /// Numbers must parse as finite `f64`, timestamps as RFC 3339 and
    /// identifiers as UUIDs. Text is taken verbatim.
    pub fn coerce(kind: FieldKind, field: &str, raw: &str) -> QueryResult<Self> {
        let invalid = || QueryError::InvalidQueryValue {
            field: field.to_string(),
            value: raw.to_string(),
        };
        let trimmed = raw.trim();

        match kind {
            FieldKind::Identifier => Uuid::parse_str(trimmed)
                .map(FieldValue::Id)
                .map_err(|_| invalid()),
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(invalid),
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| FieldValue::Timestamp(dt.with_timezone(&Utc)))
                .map_err(|_| invalid()),
        }
    }

    /// Order two values of the same type. Values of different types are incomparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Id(a), FieldValue::Id(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Canonical text form of a timestamp.
///
/// Fixed millisecond precision keeps the stored strings lexicographically
/// ordered, so range comparisons on the store agree with in-memory ones.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A queryable field of a resource.
///
/// Implement this on a field enum of your record type; the builder uses it to
/// resolve user-supplied field names and to coerce comparison values.
pub trait QueryField:
    Copy + Eq + Hash + Ord + Debug + Display + FromStr + Send + Sync + 'static
{
    /// Every field of the resource, in serialization order.
    fn all() -> &'static [Self];

    /// The identifier field of the resource.
    fn identifier() -> Self;

    /// Value type of the field.
    fn kind(self) -> FieldKind;

    /// Key under which the field appears in serialized and stored records.
    fn key(self) -> &'static str;

    fn is_identifier(self) -> bool {
        self == Self::identifier()
    }

    /// Resolve a user-supplied field name.
    fn parse_name(name: &str) -> QueryResult<Self> {
        name.trim()
            .parse()
            .map_err(|_| QueryError::UnknownField(name.to_string()))
    }
}

/// A record that can be filtered, sorted and projected.
pub trait Queryable: Serialize {
    type Field: QueryField;

    /// Current value of `field`, or `None` when the record has no value for it.
    fn field_value(&self, field: Self::Field) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number_from_text() {
        let value = FieldValue::coerce(FieldKind::Number, "price", " 500 ").unwrap();
        assert_eq!(value, FieldValue::Number(500.0));
    }

    #[test]
    fn test_coerce_number_rejects_garbage() {
        let err = FieldValue::coerce(FieldKind::Number, "price", "cheap").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidQueryValue {
                field: "price".to_string(),
                value: "cheap".to_string()
            }
        );
    }

    #[test]
    fn test_coerce_number_rejects_non_finite() {
        assert!(FieldValue::coerce(FieldKind::Number, "price", "NaN").is_err());
        assert!(FieldValue::coerce(FieldKind::Number, "price", "inf").is_err());
    }

    #[test]
    fn test_coerce_timestamp() {
        let value =
            FieldValue::coerce(FieldKind::Timestamp, "createdAt", "2024-05-01T10:00:00+02:00")
                .unwrap();
        match value {
            FieldValue::Timestamp(dt) => {
                assert_eq!(format_timestamp(&dt), "2024-05-01T08:00:00.000Z")
            }
            other => panic!("expected timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_identifier() {
        let id = Uuid::new_v4();
        let value = FieldValue::coerce(FieldKind::Identifier, "_id", &id.to_string()).unwrap();
        assert_eq!(value, FieldValue::Id(id));
        assert!(FieldValue::coerce(FieldKind::Identifier, "_id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_compare_mismatched_types() {
        let number = FieldValue::Number(1.0);
        let text = FieldValue::Text("1".to_string());
        assert_eq!(number.compare(&text), None);
        assert_eq!(
            number.compare(&FieldValue::Number(2.0)),
            Some(Ordering::Less)
        );
    }
}
