//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs.
///
/// The title is replaced at startup with `PROJECT_NAME`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store API",
        description = "Product catalog backed by MongoDB"
    ),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Document titled for this deployment
pub fn document(project_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = project_name.to_string();
    doc
}
