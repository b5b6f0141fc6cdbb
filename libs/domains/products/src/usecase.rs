//! Product Usecase - the only layer that talks to the store

use mongodb::bson::{doc, Bson, Document};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::decimal::f64_to_store_decimal;
use crate::error::{ProductError, ProductResult};
use crate::models::{id_to_bson, store_now, ProductRecord};
use crate::schemas::{Patch, ProductIn, ProductOut, ProductUpdate};
use crate::store::ProductStore;

/// Create, read, query, update and delete for products.
///
/// Errors are returned as [`ProductError`] and mapped to HTTP responses
/// by the handlers, never here.
pub struct ProductUsecase<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> ProductUsecase<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Inserts a new product. The returned value is built from the record
    /// that was written; it is not read back.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: ProductIn) -> ProductResult<ProductOut> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let record = ProductRecord::new(input);
        self.store
            .insert_one(&record)
            .await
            .map_err(ProductError::insertion)?;

        ProductOut::try_from(record)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<ProductOut> {
        let record = self.find_existing(id).await?;
        ProductOut::try_from(record)
    }

    /// Products whose price lies within the given inclusive bounds.
    /// With no bounds every product is returned.
    #[instrument(skip(self))]
    pub async fn query(
        &self,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> ProductResult<Vec<ProductOut>> {
        let filter = price_filter(min_price, max_price)?;
        self.store
            .find(filter)
            .await?
            .into_iter()
            .map(ProductOut::try_from)
            .collect()
    }

    /// Writes only the supplied fields and returns the post-update product.
    ///
    /// `updated_at` is stamped with the current time unless the patch
    /// carries one, which must not precede `created_at`.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: ProductUpdate) -> ProductResult<ProductOut> {
        patch
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let existing = self.find_existing(id).await?;

        let updated_at = match &patch.updated_at {
            Patch::Value(at) if *at < existing.created_at => {
                return Err(ProductError::Validation(format!(
                    "updated_at {at} precedes created_at {}",
                    existing.created_at
                )));
            }
            Patch::Value(at) => *at,
            Patch::Absent | Patch::Null => store_now(),
        };

        let update = doc! { "$set": patch.to_set_document(updated_at) };
        let record = self
            .store
            .find_one_and_update(id_filter(id), update)
            .await?
            .ok_or_else(|| ProductError::not_found(id))?;

        ProductOut::try_from(record)
    }

    /// Removes a product. Fails with `NotFound` when the id is unknown;
    /// `Ok(false)` means it vanished between the lookup and the delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        self.find_existing(id).await?;
        let deleted = self.store.delete_one(id_filter(id)).await?;
        Ok(deleted > 0)
    }

    async fn find_existing(&self, id: Uuid) -> ProductResult<ProductRecord> {
        self.store
            .find_one(id_filter(id))
            .await?
            .ok_or_else(|| ProductError::not_found(id))
    }
}

impl<S: ProductStore> Clone for ProductUsecase<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn id_filter(id: Uuid) -> Document {
    doc! { "id": id_to_bson(id) }
}

/// `{price: {$gte: min, $lte: max}}` with only the given bounds.
fn price_filter(min_price: Option<f64>, max_price: Option<f64>) -> ProductResult<Document> {
    let mut range = Document::new();
    if let Some(min) = min_price {
        range.insert("$gte", price_bound("min_price", min)?);
    }
    if let Some(max) = max_price {
        range.insert("$lte", price_bound("max_price", max)?);
    }

    if range.is_empty() {
        Ok(Document::new())
    } else {
        Ok(doc! { "price": range })
    }
}

fn price_bound(name: &str, value: f64) -> ProductResult<Bson> {
    let bound = f64_to_store_decimal(value).ok_or_else(|| {
        ProductError::Validation(format!("{name} must be a finite number, got {value}"))
    })?;
    Ok(Bson::Decimal128(bound))
}
