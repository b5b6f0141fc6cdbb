//! Products API routes
//!
//! Wires the products domain to its MongoDB collection.

use axum::Router;
use domain_products::{MongoProductStore, ProductUsecase, handlers};

use crate::state::AppState;

/// Store for the configured products collection, with its indexes in place.
pub async fn store(state: &AppState) -> eyre::Result<MongoProductStore> {
    let store = MongoProductStore::with_collection(&state.db, &state.config.products_collection);
    store.init_indexes().await?;
    Ok(store)
}

/// Create products router
pub fn router(store: MongoProductStore) -> Router {
    handlers::router(ProductUsecase::new(store))
}
