//! Product Service - Business logic layer

use query_builder::{FieldValue, Predicate, QuerySpec, ResourceQuery};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductField, ReplaceProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Turns raw query criteria into a validated [`ResourceQuery`] before any
/// repository call, so a rejected query never reaches the store.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.insert(Product::new(input)).await
    }

    /// Products matching `spec`, projected when it names fields.
    #[instrument(skip(self))]
    pub async fn list(&self, spec: &QuerySpec) -> ProductResult<Vec<Value>> {
        let query = Self::build(spec)?;
        let products = self
            .repository
            .find(query.filter.clone(), query.sort)
            .await?;

        products
            .iter()
            .map(|product| query.project(product).map_err(ProductError::from))
            .collect()
    }

    /// Number of products matching the filter part of `spec`.
    #[instrument(skip(self))]
    pub async fn count(&self, spec: &QuerySpec) -> ProductResult<u64> {
        let query = Self::build(spec)?;
        self.repository.count(query.filter).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .find_one(Predicate::identifier(FieldValue::Id(id)))
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn replace(&self, id: Uuid, input: ReplaceProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository
            .update_by_id(id, input.normalized())
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .delete_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    fn build(spec: &QuerySpec) -> ProductResult<ResourceQuery<ProductField>> {
        spec.build::<ProductField>().map_err(|e| {
            tracing::debug!(error = %e, "Rejected product query");
            ProductError::from(e)
        })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
