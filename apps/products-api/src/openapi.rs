//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Service-level operations; product routes are merged in from the domain.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "0.1.0",
        description = "Products resource with filter, combinator, sort and projection queries",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(crate::api::welcome, crate::api::health::ready),
    tags(
        (name = "Health", description = "Liveness and readiness")
    )
)]
struct ServiceDoc;

/// Combined OpenAPI documentation for Products API
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = ServiceDoc::openapi();
        doc.merge(domain_products::ApiDoc::openapi());
        doc
    }
}
