//! MongoDB implementation of ProductStore

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::models::ProductRecord;
use crate::store::{ProductStore, StoreResult};

pub const DEFAULT_COLLECTION: &str = "products";

pub struct MongoProductStore {
    collection: Collection<ProductRecord>,
}

impl MongoProductStore {
    /// Store backed by the `products` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductRecord>(collection_name);
        Self { collection }
    }

    /// Unique index on `id`, plus an ascending `price` index for range queries.
    pub async fn init_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(
            collection = %self.collection.name(),
            "Product indexes created successfully"
        );
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    #[instrument(skip(self, record), fields(product_id = %record.id))]
    async fn insert_one(&self, record: &ProductRecord) -> StoreResult<()> {
        self.collection.insert_one(record).await?;
        tracing::info!(product_id = %record.id, "Product inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: Document) -> StoreResult<Option<ProductRecord>> {
        Ok(self.collection.find_one(filter).await?)
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: Document) -> StoreResult<Vec<ProductRecord>> {
        let cursor = self.collection.find(filter).await?;
        let records: Vec<ProductRecord> = cursor.try_collect().await?;
        tracing::debug!(count = records.len(), "Products fetched");
        Ok(records)
    }

    #[instrument(skip(self, update))]
    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> StoreResult<Option<ProductRecord>> {
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        if let Some(ref record) = updated {
            tracing::info!(product_id = %record.id, "Product updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = self.collection.delete_one(filter).await?;
        tracing::info!(deleted = result.deleted_count, "Product delete executed");
        Ok(result.deleted_count)
    }
}
