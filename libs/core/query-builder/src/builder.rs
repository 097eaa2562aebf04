use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::field::{FieldValue, QueryField, Queryable};
use crate::operator::{Combinator, Operator};
use crate::predicate::{Comparison, Predicate};
use crate::projection::Projection;
use crate::sort::{SortDirection, SortSpec};

/// Query-string keys that never name a comparison field.
const COMBINATOR_KEYS: [&str; 2] = ["combinator", "op"];
const SORT_KEY: &str = "sort";
const ORDER_KEY: &str = "order";
const PROJECTION_KEYS: [&str; 2] = ["fields", "projection"];

/// One raw `(field, operator, value)` triple as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComparison {
    pub field: String,
    pub operator: String,
    pub value: String,
}

/// The unvalidated intent of a single read request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub comparisons: Vec<RawComparison>,
    pub combinator: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub projection: Vec<String>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compare(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.comparisons.push(RawComparison {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_combinator(mut self, combinator: impl Into<String>) -> Self {
        self.combinator = Some(combinator.into());
        self
    }

    pub fn sort_by(mut self, expression: impl Into<String>) -> Self {
        self.sort = Some(expression.into());
        self
    }

    pub fn order(mut self, direction: impl Into<String>) -> Self {
        self.order = Some(direction.into());
        self
    }

    pub fn project<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Read flat URL query pairs.
    ///
    /// `field=value` compares with `default_operator`, `field[op]=value` with
    /// `op`. `combinator` (or `op`), `sort`, `order` and `fields` (or
    /// `projection`, comma separated) are reserved keys. Nothing is validated
    /// here; see [`QuerySpec::build`].
    pub fn from_pairs<I, K, V>(pairs: I, default_operator: Operator) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = Self::new();

        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let value = value.as_ref();

            if COMBINATOR_KEYS.contains(&key) {
                spec.combinator = Some(value.to_string());
            } else if key == SORT_KEY {
                spec.sort = Some(value.to_string());
            } else if key == ORDER_KEY {
                spec.order = Some(value.to_string());
            } else if PROJECTION_KEYS.contains(&key) {
                spec.projection.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from),
                );
            } else if let Some((field, operator)) = split_bracketed(key) {
                spec = spec.compare(field, operator, value);
            } else {
                spec = spec.compare(key, default_operator.to_string(), value);
            }
        }

        spec
    }

    /// Validate the spec against the fields of a resource.
    ///
    /// Every comparison, the combinator, the sort and the projection are
    /// checked; the first failure is returned and no query is produced.
    pub fn build<F: QueryField>(&self) -> QueryResult<ResourceQuery<F>> {
        let conditions = self
            .comparisons
            .iter()
            .map(|raw| {
                let field = F::parse_name(&raw.field)?;
                let operator = Operator::parse_token(&raw.operator)?;
                let value = FieldValue::coerce(field.kind(), &raw.field, &raw.value)?;
                Ok(Comparison::new(field, operator, value))
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let combinator = match self.combinator.as_deref() {
            Some(token) => Combinator::parse_token(token)?,
            None => Combinator::None,
        };

        // A bad `order` fails even when there is no sort.
        if let Some(order) = self.order.as_deref().filter(|o| !o.trim().is_empty()) {
            SortDirection::parse_token(order)?;
        }
        let sort = self
            .sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| SortSpec::parse(s, self.order.as_deref()))
            .transpose()?;

        let projection = if self.projection.is_empty() {
            None
        } else {
            Some(Projection::parse(&self.projection)?)
        };

        tracing::debug!(
            conditions = conditions.len(),
            combinator = %combinator,
            sorted = sort.is_some(),
            projected = projection.is_some(),
            "Built resource query"
        );

        Ok(ResourceQuery {
            filter: Predicate::combine(combinator, conditions),
            sort,
            projection,
        })
    }
}

fn split_bracketed(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let (field, operator) = inner.split_once('[')?;
    Some((field, operator))
}

/// A validated, typed query ready to hand to a data store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery<F: QueryField> {
    pub filter: Predicate<F>,
    pub sort: Option<SortSpec<F>>,
    pub projection: Option<Projection<F>>,
}

impl<F: QueryField> ResourceQuery<F> {
    /// Filter and sort records in memory, keeping the input order for ties.
    pub fn evaluate<R>(&self, records: &[R]) -> Vec<R>
    where
        R: Queryable<Field = F> + Clone,
    {
        let mut matched: Vec<R> = records
            .iter()
            .filter(|r| self.filter.matches(*r))
            .cloned()
            .collect();
        if let Some(sort) = &self.sort {
            sort.sort(&mut matched);
        }
        matched
    }

    /// Serialize a record, applying the projection when there is one.
    pub fn project<R: Queryable<Field = F>>(&self, record: &R) -> QueryResult<Value> {
        match &self.projection {
            Some(projection) => projection.apply(record),
            None => serde_json::to_value(record).map_err(|e| QueryError::Serialization(e.to_string())),
        }
    }
}
