use async_trait::async_trait;
use query_builder::{Predicate, SortSpec};
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductField, ReplaceProduct};

/// Data-store collaborator for products.
///
/// Filters and sorts arrive already validated by the query builder, so
/// implementations only translate them for their backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Matching products, sorted when `sort` is given, otherwise in storage order.
    async fn find(
        &self,
        filter: Predicate<ProductField>,
        sort: Option<SortSpec<ProductField>>,
    ) -> ProductResult<Vec<Product>>;

    async fn find_one(&self, filter: Predicate<ProductField>) -> ProductResult<Option<Product>>;

    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Replace the mutable fields of a product, returning the updated record.
    ///
    /// `id` and `createdAt` are left untouched. `None` when no product has `id`.
    async fn update_by_id(
        &self,
        id: Uuid,
        replacement: ReplaceProduct,
    ) -> ProductResult<Option<Product>>;

    /// Remove a product, returning it. `None` when no product has `id`.
    async fn delete_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn count(&self, filter: Predicate<ProductField>) -> ProductResult<u64>;
}
