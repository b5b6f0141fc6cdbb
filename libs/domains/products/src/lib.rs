//! Products Domain
//!
//! Product catalog backed by a MongoDB collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, status codes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Usecase    │  ← Validation, existence checks, timestamps
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Store     │  ← Document primitives (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Records    │  ← Stored layout, Decimal128 prices
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductStore, ProductUsecase};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("store");
//!
//! let store = MongoProductStore::new(&db);
//! store.init_indexes().await?;
//!
//! let router = handlers::router(ProductUsecase::new(store));
//! # Ok(())
//! # }
//! ```

pub mod decimal;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod schemas;
pub mod store;
pub mod usecase;

pub use self::mongodb::{MongoProductStore, DEFAULT_COLLECTION};
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::ProductRecord;
pub use schemas::{Patch, ProductIn, ProductOut, ProductUpdate};
pub use store::{ProductStore, StoreError, StoreResult};
pub use usecase::ProductUsecase;
