//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes.
///
/// Mounted under `ROOT_PATH` by `axum_helpers::create_router`.
pub fn routes(state: &AppState, products: Router) -> Router {
    Router::new()
        .nest("/products", products)
        .merge(health::router(state.clone()))
}
