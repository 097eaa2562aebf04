//! Translation of queries into MongoDB filter and sort documents.

use mongodb::bson::{Bson, Document, doc};

use crate::field::{FieldValue, QueryField, format_timestamp};
use crate::predicate::{Comparison, Predicate};
use crate::sort::SortSpec;

impl FieldValue {
    /// BSON form of the value, matching how records store it.
    ///
    /// Identifiers and timestamps are stored as strings.
    pub fn to_bson(&self) -> Bson {
        match self {
            FieldValue::Id(id) => Bson::String(id.to_string()),
            FieldValue::Text(text) => Bson::String(text.clone()),
            FieldValue::Number(number) => Bson::Double(*number),
            FieldValue::Timestamp(ts) => Bson::String(format_timestamp(ts)),
        }
    }
}

impl<F: QueryField> Comparison<F> {
    pub fn to_document(&self) -> Document {
        doc! {
            self.field.key(): { self.operator.driver_token(): self.value.to_bson() }
        }
    }
}

impl<F: QueryField> Predicate<F> {
    /// Filter document for `find`, `count_documents` and friends.
    pub fn to_document(&self) -> Document {
        match self {
            Predicate::All => Document::new(),
            Predicate::Compare(condition) => condition.to_document(),
            Predicate::And(parts) => doc! { "$and": Self::documents(parts) },
            Predicate::Or(parts) => doc! { "$or": Self::documents(parts) },
            Predicate::Nor(parts) => doc! { "$nor": Self::documents(parts) },
        }
    }

    fn documents(parts: &[Predicate<F>]) -> Vec<Document> {
        parts.iter().map(Predicate::to_document).collect()
    }
}

impl<F: QueryField> SortSpec<F> {
    /// Sort document, optionally followed by an ascending tie-breaker field.
    pub fn to_document(&self, tie_breaker: Option<F>) -> Document {
        let mut sort = doc! { self.field.key(): self.direction.as_i32() };
        if let Some(field) = tie_breaker.filter(|f| *f != self.field) {
            sort.insert(field.key(), 1);
        }
        sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{Combinator, Operator};
    use crate::test_support::ItemField;
    use uuid::Uuid;

    #[test]
    fn test_empty_predicate_is_empty_document() {
        assert_eq!(Predicate::<ItemField>::All.to_document(), Document::new());
    }

    #[test]
    fn test_single_comparison_document() {
        let predicate = Predicate::Compare(Comparison::new(
            ItemField::Price,
            Operator::Lt,
            FieldValue::Number(500.0),
        ));
        assert_eq!(predicate.to_document(), doc! { "price": { "$lt": 500.0 } });
    }

    #[test]
    fn test_or_document() {
        let predicate = Predicate::combine(
            Combinator::Or,
            vec![
                Comparison::new(ItemField::Price, Operator::Eq, FieldValue::Number(60.0)),
                Comparison::new(ItemField::Rating, Operator::Gte, FieldValue::Number(4.0)),
            ],
        );
        assert_eq!(
            predicate.to_document(),
            doc! {
                "$or": [
                    { "price": { "$eq": 60.0 } },
                    { "rating": { "$gte": 4.0 } },
                ]
            }
        );
    }

    #[test]
    fn test_identifier_is_stored_as_string() {
        let id = Uuid::from_u128(7);
        let predicate = Predicate::<ItemField>::identifier(FieldValue::Id(id));
        assert_eq!(
            predicate.to_document(),
            doc! { "_id": { "$eq": id.to_string() } }
        );
    }

    #[test]
    fn test_sort_document_with_tie_breaker() {
        let sort = SortSpec::descending(ItemField::Price);
        let document = sort.to_document(Some(ItemField::CreatedAt));
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["price", "createdAt"]);
        assert_eq!(document.get_i32("price").unwrap(), -1);

        let same = SortSpec::ascending(ItemField::CreatedAt).to_document(Some(ItemField::CreatedAt));
        assert_eq!(same.len(), 1);
    }
}
