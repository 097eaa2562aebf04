//! In-memory implementation of ProductRepository
//!
//! Evaluates filters and sorts with the query builder itself. Used by tests and
//! selectable at runtime with `PRODUCTS_STORE=memory`.

use async_trait::async_trait;
use query_builder::{Predicate, ResourceQuery, SortSpec};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductField, ReplaceProduct};
use crate::repository::ProductRepository;

/// Products kept in insertion order behind a shared lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with `products`, in that order.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        filter: Predicate<ProductField>,
        sort: Option<SortSpec<ProductField>>,
    ) -> ProductResult<Vec<Product>> {
        let query = ResourceQuery {
            filter,
            sort,
            projection: None,
        };
        Ok(query.evaluate(&self.products.read().await))
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: Predicate<ProductField>) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| filter.matches(*product)).cloned())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    #[instrument(skip(self, replacement))]
    async fn update_by_id(
        &self,
        id: Uuid,
        replacement: ReplaceProduct,
    ) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply_replacement(replacement);
            product.clone()
        }))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: Predicate<ProductField>) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|product| filter.matches(*product)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use query_builder::{Combinator, Comparison, FieldValue, Operator};

    fn product(n: u128, title: &str, price: f64, rating: Option<f64>) -> Product {
        Product {
            id: Uuid::from_u128(n),
            title: title.to_string(),
            price,
            rating,
            description: format!("{} description", title),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n as i64),
        }
    }

    fn seeded() -> InMemoryProductRepository {
        InMemoryProductRepository::with_products(vec![
            product(1, "Pen", 50.0, Some(4.0)),
            product(2, "Laptop", 2000.0, Some(5.0)),
            product(3, "Desk", 500.0, None),
            product(4, "Lamp", 500.0, Some(3.0)),
        ])
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    fn price(operator: Operator, value: f64) -> Comparison<ProductField> {
        Comparison::new(ProductField::Price, operator, FieldValue::Number(value))
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let found = seeded().find(Predicate::All, None).await.unwrap();
        assert_eq!(titles(&found), vec!["Pen", "Laptop", "Desk", "Lamp"]);
    }

    #[tokio::test]
    async fn test_sort_desc_keeps_ties_in_insertion_order() {
        let found = seeded()
            .find(Predicate::All, Some(SortSpec::descending(ProductField::Price)))
            .await
            .unwrap();
        assert_eq!(titles(&found), vec!["Laptop", "Desk", "Lamp", "Pen"]);
    }

    #[tokio::test]
    async fn test_find_with_or_filter_and_count() {
        let repo = seeded();
        let filter = Predicate::combine(
            Combinator::Or,
            vec![price(Operator::Lt, 100.0), price(Operator::Gte, 2000.0)],
        );

        let found = repo.find(filter.clone(), None).await.unwrap();
        assert_eq!(titles(&found), vec!["Pen", "Laptop"]);
        assert_eq!(repo.count(filter).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let repo = seeded();
        let before = repo
            .find_one(Predicate::identifier(FieldValue::Id(Uuid::from_u128(3))))
            .await
            .unwrap()
            .unwrap();

        let updated = repo
            .update_by_id(
                before.id,
                ReplaceProduct {
                    title: "Standing desk".to_string(),
                    price: 900.0,
                    rating: Some(4.5),
                    description: "adjustable".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, before.id);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.title, "Standing desk");
        assert_eq!(updated.rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = seeded();
        let missing = Uuid::from_u128(99);
        let replacement = ReplaceProduct {
            title: "Ghost".to_string(),
            price: 100.0,
            rating: None,
            description: "nothing".to_string(),
        };

        assert!(repo.update_by_id(missing, replacement).await.unwrap().is_none());
        assert!(repo.delete_by_id(missing).await.unwrap().is_none());
        assert_eq!(repo.len().await, 4);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product() {
        let repo = seeded();
        let removed = repo.delete_by_id(Uuid::from_u128(2)).await.unwrap().unwrap();

        assert_eq!(removed.title, "Laptop");
        assert_eq!(repo.len().await, 3);
        assert!(!repo.is_empty().await);
        assert!(repo
            .find_one(Predicate::identifier(FieldValue::Id(Uuid::from_u128(2))))
            .await
            .unwrap()
            .is_none());
    }
}
