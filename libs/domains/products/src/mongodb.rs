//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use query_builder::{FieldValue, Predicate, SortSpec};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductField, ReplaceProduct};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
///
/// Ties in a sorted listing are broken by `createdAt` ascending, so results
/// come back in creation order like the unsorted listing.
#[derive(Debug, Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>(DEFAULT_COLLECTION),
        }
    }

    /// Create the indexes backing the filter and sort routes.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = [
            ("price", "idx_price"),
            ("rating", "idx_rating"),
            ("createdAt", "idx_created_at"),
            ("title", "idx_title"),
        ]
        .into_iter()
        .map(|(key, name)| {
            IndexModel::builder()
                .keys(doc! { key: 1 })
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        })
        .collect::<Vec<_>>();

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        Predicate::<ProductField>::identifier(FieldValue::Id(id)).to_document()
    }

    fn sort_document(sort: &SortSpec<ProductField>) -> Document {
        sort.to_document(Some(ProductField::CreatedAt))
    }

    /// `$set` the replaced fields; a missing rating is `$unset`.
    fn replacement_update(replacement: &ReplaceProduct) -> Document {
        let mut set = doc! {
            "title": replacement.title.as_str(),
            "price": replacement.price,
            "description": replacement.description.as_str(),
        };

        match replacement.rating {
            Some(rating) => {
                set.insert("rating", rating);
                doc! { "$set": set }
            }
            None => doc! { "$set": set, "$unset": { "rating": "" } },
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        filter: Predicate<ProductField>,
        sort: Option<SortSpec<ProductField>>,
    ) -> ProductResult<Vec<Product>> {
        let mut find = self.collection.find(filter.to_document());
        if let Some(sort) = sort {
            find = find.sort(Self::sort_document(&sort));
        }

        let cursor = find.await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: Predicate<ProductField>) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(filter.to_document()).await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;
        tracing::info!("Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, replacement))]
    async fn update_by_id(
        &self,
        id: Uuid,
        replacement: ReplaceProduct,
    ) -> ProductResult<Option<Product>> {
        let replacement = replacement.normalized();
        let product = self
            .collection
            .find_one_and_update(Self::id_filter(id), Self::replacement_update(&replacement))
            .return_document(ReturnDocument::After)
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: Predicate<ProductField>) -> ProductResult<u64> {
        let count = self.collection.count_documents(filter.to_document()).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_id_filter_uses_string_id() {
        let id = Uuid::from_u128(7);
        let filter = MongoProductRepository::id_filter(id);
        assert_eq!(filter, doc! { "_id": { "$eq": id.to_string() } });
    }

    #[test]
    fn test_sort_document_breaks_ties_by_creation() {
        let sort = MongoProductRepository::sort_document(&SortSpec::descending(ProductField::Price));
        assert_eq!(sort, doc! { "price": -1, "createdAt": 1 });

        let sort =
            MongoProductRepository::sort_document(&SortSpec::ascending(ProductField::CreatedAt));
        assert_eq!(sort, doc! { "createdAt": 1 });
    }

    #[test]
    fn test_replacement_update_sets_rating() {
        let update = MongoProductRepository::replacement_update(&ReplaceProduct {
            title: "Pen".to_string(),
            price: 120.0,
            rating: Some(4.0),
            description: "blue pen".to_string(),
        });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get("rating"), Some(&Bson::Double(4.0)));
        assert!(update.get("$unset").is_none());
        assert!(!set.contains_key("_id"));
        assert!(!set.contains_key("createdAt"));
    }

    #[test]
    fn test_replacement_update_unsets_missing_rating() {
        let update = MongoProductRepository::replacement_update(&ReplaceProduct {
            title: "Pen".to_string(),
            price: 120.0,
            rating: None,
            description: "blue pen".to_string(),
        });

        assert_eq!(update.get_document("$unset").unwrap(), &doc! { "rating": "" });
        assert!(!update.get_document("$set").unwrap().contains_key("rating"));
    }

    #[test]
    fn test_stored_document_shape() {
        let product = Product {
            id: Uuid::from_u128(1),
            title: "Pen".to_string(),
            price: 100.0,
            rating: None,
            description: "blue pen".to_string(),
            created_at: chrono::DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        };

        let document = mongodb::bson::to_document(&product).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), product.id.to_string());
        assert_eq!(document.get_str("createdAt").unwrap(), "2024-05-01T10:00:00.000Z");
        assert!(!document.contains_key("rating"));

        let back: Product = mongodb::bson::from_document(document).unwrap();
        assert_eq!(back, product);
    }
}
