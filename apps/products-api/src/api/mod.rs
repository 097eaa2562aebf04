//! API routes module

pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

pub const WELCOME: &str = "Welcome to home page of the server";

/// Welcome text
#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    responses(
        (status = 200, description = "Welcome text", body = String, content_type = "text/plain")
    )
)]
pub async fn welcome() -> &'static str {
    WELCOME
}

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(products::router(state))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await
}
