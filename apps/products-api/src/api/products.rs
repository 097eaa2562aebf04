//! Products API routes

use axum::Router;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::{AppState, Store};

/// Products routes over the configured store
pub fn router(state: &AppState) -> Router {
    match &state.store {
        Store::Mongo { db, .. } => handlers::router(ProductService::new(MongoProductRepository::new(db))),
        Store::Memory(repository) => handlers::router(ProductService::new(repository.clone())),
    }
}

/// Initialize products indexes (MongoDB only)
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    if let Store::Mongo { db, .. } = &state.store {
        MongoProductRepository::new(db).init_indexes().await?;
    }
    Ok(())
}
