use crate::field::{FieldValue, QueryField, Queryable};
use crate::operator::{Combinator, Operator};

/// A single `field <operator> value` condition with a coerced value.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<F> {
    pub field: F,
    pub operator: Operator,
    pub value: FieldValue,
}

impl<F: QueryField> Comparison<F> {
    pub fn new(field: F, operator: Operator, value: FieldValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    /// A record without a value for the field only satisfies `ne`, as in MongoDB.
    pub fn matches<R: Queryable<Field = F>>(&self, record: &R) -> bool {
        match record.field_value(self.field) {
            Some(actual) => actual
                .compare(&self.value)
                .is_some_and(|ordering| self.operator.holds(ordering)),
            None => self.operator == Operator::Ne,
        }
    }
}

/// Structured filter condition handed to a data store.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
    /// Matches every record.
    All,
    Compare(Comparison<F>),
    And(Vec<Predicate<F>>),
    Or(Vec<Predicate<F>>),
    Nor(Vec<Predicate<F>>),
}

impl<F: QueryField> Predicate<F> {
    /// Compose conditions.
    ///
    /// No conditions match everything and a single condition ignores the
    /// combinator. An unspecified combinator composes as AND.
    pub fn combine(combinator: Combinator, mut conditions: Vec<Comparison<F>>) -> Self {
        match conditions.len() {
            0 => Predicate::All,
            1 => match conditions.pop() {
                Some(condition) => Predicate::Compare(condition),
                None => Predicate::All,
            },
            _ => {
                let parts = conditions.into_iter().map(Predicate::Compare).collect();
                match combinator {
                    Combinator::Or => Predicate::Or(parts),
                    Combinator::Nor => Predicate::Nor(parts),
                    Combinator::And | Combinator::None => Predicate::And(parts),
                }
            }
        }
    }

    /// Predicate selecting the record with the given identifier value.
    pub fn identifier(value: FieldValue) -> Self {
        Predicate::Compare(Comparison::new(F::identifier(), Operator::Eq, value))
    }

    pub fn matches<R: Queryable<Field = F>>(&self, record: &R) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Compare(condition) => condition.matches(record),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(record)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(record)),
            Predicate::Nor(parts) => !parts.iter().any(|p| p.matches(record)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }
}
