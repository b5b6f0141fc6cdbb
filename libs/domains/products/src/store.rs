use async_trait::async_trait;
use mongodb::bson::Document;
use thiserror::Error;

use crate::models::ProductRecord;

/// Failure reported by a [`ProductStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Driver(#[from] mongodb::error::Error),

    /// Failure from a store that is not backed by the MongoDB driver
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document-store primitives the product usecase is written against.
///
/// Filters and updates are plain BSON documents (`{id: ..}`,
/// `{price: {$gte: .., $lte: ..}}`, `{$set: {..}}`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_one(&self, record: &ProductRecord) -> StoreResult<()>;

    async fn find_one(&self, filter: Document) -> StoreResult<Option<ProductRecord>>;

    /// All matches, in store iteration order
    async fn find(&self, filter: Document) -> StoreResult<Vec<ProductRecord>>;

    /// Applies `update` to the first match and returns the post-image.
    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> StoreResult<Option<ProductRecord>>;

    /// Number of documents removed
    async fn delete_one(&self, filter: Document) -> StoreResult<u64>;
}
