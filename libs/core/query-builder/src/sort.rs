use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

use crate::error::{QueryError, QueryResult};
use crate::field::{QueryField, Queryable};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    #[strum(to_string = "asc", serialize = "ascending", serialize = "1")]
    Asc,
    #[strum(to_string = "desc", serialize = "descending", serialize = "-1")]
    Desc,
}

impl SortDirection {
    pub fn parse_token(token: &str) -> QueryResult<Self> {
        token
            .trim()
            .parse()
            .map_err(|_| QueryError::InvalidSortDirection(token.to_string()))
    }

    /// Direction as understood by the document store (`1` or `-1`).
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Ordering of a result set by a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: QueryField> SortSpec<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn descending(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse a sort expression.
    ///
    /// Accepts `price`, `-price` and `price:desc`. A separate `order` token,
    /// when given, overrides the direction found in the expression.
    pub fn parse(expression: &str, order: Option<&str>) -> QueryResult<Self> {
        let expression = expression.trim();
        let (name, mut direction) = match expression.split_once(':') {
            Some((name, dir)) => (name, SortDirection::parse_token(dir)?),
            None => match expression.strip_prefix('-') {
                Some(name) => (name, SortDirection::Desc),
                None => (
                    expression.strip_prefix('+').unwrap_or(expression),
                    SortDirection::Asc,
                ),
            },
        };

        if let Some(order) = order.filter(|o| !o.trim().is_empty()) {
            direction = SortDirection::parse_token(order)?;
        }

        Ok(Self::new(F::parse_name(name)?, direction))
    }

    /// Compare two records by the sort field.
    ///
    /// Records lacking a value sort before those having one when ascending.
    pub fn compare<R: Queryable<Field = F>>(&self, a: &R, b: &R) -> Ordering {
        let ordering = match (a.field_value(self.field), b.field_value(self.field)) {
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sort records in place; equal keys keep their current order.
    pub fn sort<R: Queryable<Field = F>>(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ItemField, items};

    #[test]
    fn test_parse_prefix_forms() {
        let spec = SortSpec::<ItemField>::parse("-price", None).unwrap();
        assert_eq!(spec, SortSpec::descending(ItemField::Price));

        let spec = SortSpec::<ItemField>::parse("price", None).unwrap();
        assert_eq!(spec, SortSpec::ascending(ItemField::Price));
    }

    #[test]
    fn test_parse_suffix_and_order_override() {
        let spec = SortSpec::<ItemField>::parse("rating:DESC", None).unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);

        let spec = SortSpec::<ItemField>::parse("rating", Some("-1")).unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);

        let spec = SortSpec::<ItemField>::parse("-rating", Some("asc")).unwrap();
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            SortSpec::<ItemField>::parse("weight", None).unwrap_err(),
            QueryError::UnknownField("weight".to_string())
        );
        assert_eq!(
            SortSpec::<ItemField>::parse("price:sideways", None).unwrap_err(),
            QueryError::InvalidSortDirection("sideways".to_string())
        );
    }

    #[test]
    fn test_sort_descending_by_price() {
        let mut records = items();
        SortSpec::descending(ItemField::Price).sort(&mut records);
        let prices: Vec<f64> = records.iter().map(|i| i.price).collect();
        let mut expected = prices.clone();
        expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(prices, expected);
    }

    #[test]
    fn test_sort_keeps_insertion_order_for_ties() {
        let mut records = items();
        let tied: Vec<&str> = records
            .iter()
            .filter(|i| i.price == 100.0)
            .map(|i| i.name)
            .collect();
        assert!(tied.len() > 1);

        SortSpec::ascending(ItemField::Price).sort(&mut records);
        let after: Vec<&str> = records
            .iter()
            .filter(|i| i.price == 100.0)
            .map(|i| i.name)
            .collect();
        assert_eq!(tied, after);
    }

    #[test]
    fn test_missing_values_first_when_ascending() {
        let mut records = items();
        SortSpec::ascending(ItemField::Rating).sort(&mut records);
        assert_eq!(records[0].name, "unrated");

        SortSpec::descending(ItemField::Rating).sort(&mut records);
        assert_eq!(records.last().map(|i| i.name), Some("unrated"));
    }
}
