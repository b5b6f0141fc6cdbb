//! HTTP handlers for Products API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, InternalServerErrorResponse,
        NotFoundResponse, UnprocessableEntityResponse,
    },
    QueryParams, UuidPath, ValidatedJson,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::ProductResult;
use crate::schemas::{ProductIn, ProductOut, ProductUpdate};
use crate::store::ProductStore;
use crate::usecase::ProductUsecase;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        query_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductIn, ProductOut, ProductUpdate),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<S: ProductStore + 'static>(usecase: ProductUsecase<S>) -> Router {
    let shared_usecase = Arc::new(usecase);

    Router::new()
        .route("/", get(query_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_usecase)
}

/// Inclusive price bounds for listing products
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PriceRange {
    /// Lowest price to include
    pub min_price: Option<f64>,
    /// Highest price to include
    pub max_price: Option<f64>,
}

/// List products, optionally within a price range
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PriceRange),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductOut>),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn query_products<S: ProductStore>(
    State(usecase): State<Arc<ProductUsecase<S>>>,
    QueryParams(range): QueryParams<PriceRange>,
) -> ProductResult<Json<Vec<ProductOut>>> {
    let products = usecase.query(range.min_price, range.max_price).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductIn,
    responses(
        (status = 201, description = "Product created successfully", body = ProductOut),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: ProductStore>(
    State(usecase): State<Arc<ProductUsecase<S>>>,
    ValidatedJson(input): ValidatedJson<ProductIn>,
) -> ProductResult<impl IntoResponse> {
    let product = usecase.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductOut),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: ProductStore>(
    State(usecase): State<Arc<ProductUsecase<S>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductOut>> {
    let product = usecase.get(id).await?;
    Ok(Json(product))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductOut),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<S: ProductStore>(
    State(usecase): State<Arc<ProductUsecase<S>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(patch): ValidatedJson<ProductUpdate>,
) -> ProductResult<Json<ProductOut>> {
    let product = usecase.update(id, patch).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: ProductStore>(
    State(usecase): State<Arc<ProductUsecase<S>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    usecase.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
