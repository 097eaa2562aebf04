use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::error::{QueryError, QueryResult};
use crate::field::{QueryField, Queryable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Only the listed fields are returned.
    Include,
    /// Every field except the listed ones is returned.
    Exclude,
}

/// Field projection of a read.
///
/// The identifier is controlled separately from the other fields, so
/// `title,price,-_id` is a valid include list that drops the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection<F: QueryField> {
    pub mode: ProjectionMode,
    pub fields: BTreeSet<F>,
    pub include_id: bool,
}

impl<F: QueryField> Projection<F> {
    /// Parse projection tokens such as `title`, `-description` or `-_id`.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> QueryResult<Self> {
        let mut included = BTreeSet::new();
        let mut excluded = BTreeSet::new();
        let mut include_id = true;
        let mut id_listed = false;

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            let (name, exclude) = match token.strip_prefix('-') {
                Some(name) => (name, true),
                None => (token.strip_prefix('+').unwrap_or(token), false),
            };
            let field = F::parse_name(name)?;

            if field.is_identifier() {
                include_id = !exclude;
                id_listed = true;
            } else if exclude {
                excluded.insert(field);
            } else {
                included.insert(field);
            }
        }

        if !included.is_empty() && !excluded.is_empty() {
            return Err(QueryError::InvalidProjection(
                "cannot mix included and excluded fields".to_string(),
            ));
        }

        let (mode, fields) = if !included.is_empty() {
            (ProjectionMode::Include, included)
        } else if !excluded.is_empty() {
            (ProjectionMode::Exclude, excluded)
        } else if id_listed && include_id {
            (ProjectionMode::Include, BTreeSet::new())
        } else if id_listed {
            (ProjectionMode::Exclude, BTreeSet::new())
        } else {
            return Err(QueryError::InvalidProjection(
                "no fields listed".to_string(),
            ));
        };

        Ok(Self {
            mode,
            fields,
            include_id,
        })
    }

    /// Parse a comma separated projection list.
    pub fn parse_list(list: &str) -> QueryResult<Self> {
        let tokens: Vec<&str> = list.split(',').collect();
        Self::parse(&tokens)
    }

    pub fn includes(&self, field: F) -> bool {
        if field.is_identifier() {
            return self.include_id;
        }
        match self.mode {
            ProjectionMode::Include => self.fields.contains(&field),
            ProjectionMode::Exclude => !self.fields.contains(&field),
        }
    }

    /// Serialize a record keeping only the projected keys.
    pub fn apply<R: Queryable<Field = F>>(&self, record: &R) -> QueryResult<Value> {
        let value =
            serde_json::to_value(record).map_err(|e| QueryError::Serialization(e.to_string()))?;

        match value {
            Value::Object(obj) => Ok(Value::Object(self.filter_object(obj))),
            other => Ok(other),
        }
    }

    fn filter_object(&self, obj: Map<String, Value>) -> Map<String, Value> {
        obj.into_iter()
            .filter(|(key, _)| {
                match F::all().iter().copied().find(|f| f.key() == key.as_str()) {
                    Some(field) => self.includes(field),
                    None => self.mode == ProjectionMode::Exclude,
                }
            })
            .collect()
    }
}
