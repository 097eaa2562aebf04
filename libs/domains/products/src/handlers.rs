//! HTTP handlers for Products API
//!
//! Every filter route reads the same query-string grammar (see
//! [`QuerySpec::from_pairs`]); the routes only differ in the operator used for
//! bare `field=value` pairs and in a fixed combinator.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use axum_helpers::{
    ApiResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use query_builder::{Combinator, Operator, QuerySpec};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductCount, ReplaceProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Raw `key=value` pairs of the query string, in request order.
type QueryPairs = Query<Vec<(String, String)>>;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        count_products,
        get_product,
        replace_product,
        delete_product,
        less_than,
        and_filter,
        or_filter,
        nor_filter,
        sorted_products,
    ),
    components(
        schemas(Product, CreateProduct, ReplaceProduct, ProductCount),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Queries", description = "Filter, combine and sort products")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/count", get(count_products))
        .route(
            "/products/{id}",
            get(get_product).put(replace_product).delete(delete_product),
        )
        .route("/less", get(less_than))
        .route("/and", get(and_filter))
        .route("/or", get(or_filter))
        .route("/nor", get(nor_filter))
        .route("/sort", get(sorted_products))
        .with_state(shared_service)
}

async fn fetch<R: ProductRepository>(
    service: &ProductService<R>,
    spec: QuerySpec,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    let products = service.list(&spec).await?;
    Ok(ApiResponse::success("Products fetched successfully", products))
}

fn with_combinator(spec: QuerySpec, combinator: Combinator) -> QuerySpec {
    spec.with_combinator(combinator.to_string())
}

/// List products, optionally filtered, sorted and projected
///
/// Bare `field=value` pairs compare with `eq`; use `field[op]=value` for other
/// operators (`eq`, `ne`, `lt`, `lte`, `gt`, `gte`).
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(
        ("combinator" = Option<String>, Query, description = "and | or | nor (default and)"),
        ("sort" = Option<String>, Query, description = "Sort field, e.g. price, -price or price:desc"),
        ("order" = Option<String>, Query, description = "asc | desc, overrides the sort prefix"),
        ("fields" = Option<String>, Query, description = "Projection, e.g. title,price or -description,-_id"),
    ),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    fetch(&service, QuerySpec::from_pairs(pairs, Operator::Eq)).await
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.create(input).await?;
    Ok(ApiResponse::created("Product created successfully", product))
}

/// Count products matching a filter
#[utoipa::path(
    get,
    path = "/products/count",
    tag = "Products",
    params(
        ("combinator" = Option<String>, Query, description = "and | or | nor (default and)"),
    ),
    responses(
        (status = 200, description = "Number of matching products", body = ApiResponse<ProductCount>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<ProductCount>> {
    let spec = QuerySpec::from_pairs(pairs, Operator::Eq);
    let count = service.count(&spec).await?;
    Ok(ApiResponse::success(
        "Products counted successfully",
        ProductCount { count },
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.get(id).await?;
    Ok(ApiResponse::success("Product fetched successfully", product))
}

/// Replace a product
///
/// Every mutable field is overwritten; `_id` and `createdAt` are kept.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ReplaceProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ReplaceProduct>,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.replace(id, input).await?;
    Ok(ApiResponse::success("Product updated successfully", product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<Product>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.delete(id).await?;
    Ok(ApiResponse::success("Product deleted successfully", product))
}

/// Products below a threshold: bare pairs compare with `lt`
#[utoipa::path(
    get,
    path = "/less",
    tag = "Queries",
    params(
        ("price" = Option<f64>, Query, description = "Upper bound (exclusive)"),
    ),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn less_than<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    fetch(&service, QuerySpec::from_pairs(pairs, Operator::Lt)).await
}

/// Products matching every condition
#[utoipa::path(
    get,
    path = "/and",
    tag = "Queries",
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn and_filter<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    let spec = QuerySpec::from_pairs(pairs, Operator::Eq);
    fetch(&service, with_combinator(spec, Combinator::And)).await
}

/// Products matching at least one condition
#[utoipa::path(
    get,
    path = "/or",
    tag = "Queries",
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn or_filter<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    let spec = QuerySpec::from_pairs(pairs, Operator::Eq);
    fetch(&service, with_combinator(spec, Combinator::Or)).await
}

/// Products matching none of the conditions
#[utoipa::path(
    get,
    path = "/nor",
    tag = "Queries",
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn nor_filter<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    let spec = QuerySpec::from_pairs(pairs, Operator::Eq);
    fetch(&service, with_combinator(spec, Combinator::Nor)).await
}

/// Sorted products; `sort` is required
#[utoipa::path(
    get,
    path = "/sort",
    tag = "Queries",
    params(
        ("sort" = String, Query, description = "Sort field, e.g. price, -price or price:desc"),
        ("order" = Option<String>, Query, description = "asc | desc"),
        ("combinator" = Option<String>, Query, description = "and | or | nor (default and)"),
    ),
    responses(
        (status = 200, description = "Sorted products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sorted_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): QueryPairs,
) -> ProductResult<ApiResponse<Vec<Value>>> {
    let spec = QuerySpec::from_pairs(pairs, Operator::Eq);
    if spec.sort.as_deref().is_none_or(|sort| sort.trim().is_empty()) {
        return Err(ProductError::InvalidQuery(
            "Missing 'sort' parameter".to_string(),
        ));
    }
    fetch(&service, spec).await
}
