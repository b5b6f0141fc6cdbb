//! Request and response shapes for products.
//!
//! - [`ProductIn`]: creation input, every field required
//! - [`ProductOut`]: what clients receive, price rendered as text
//! - [`ProductUpdate`]: partial update built from [`Patch`] fields

use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, Document};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::decimal::{from_store_decimal, to_store_decimal};
use crate::error::ProductError;
use crate::models::{datetime_to_bson, ProductRecord};

/// Input for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ProductIn {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "Iphone 14 Pro Max")]
    pub name: String,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    #[schema(example = 10)]
    pub quantity: i64,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(value_type = String, example = "8500")]
    pub price: Decimal,
    pub status: bool,
}

/// A product as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOut {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    #[schema(value_type = String, example = "8500")]
    pub price: Decimal,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for ProductOut {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            price: from_store_decimal(&record.price)?,
            id: record.id,
            name: record.name,
            quantity: record.quantity,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// One field of a partial update.
///
/// A missing key deserializes to `Absent` (with `#[serde(default)]`), an
/// explicit JSON `null` to `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Patch::Null, Patch::Value))
    }
}

/// Partial update. Only supplied fields are written.
///
/// `updated_at: null` is treated like an absent `updated_at`: the store
/// stamps the current time. `null` for any other field is rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub quantity: Patch<i64>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "7500.50")]
    pub price: Patch<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub status: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub updated_at: Patch<DateTime<Utc>>,
}

impl ProductUpdate {
    /// `$set` body for the supplied fields plus `updated_at`.
    pub fn to_set_document(&self, updated_at: DateTime<Utc>) -> Document {
        let mut set = Document::new();
        if let Some(name) = self.name.value() {
            set.insert("name", name.as_str());
        }
        if let Some(quantity) = self.quantity.value() {
            set.insert("quantity", *quantity);
        }
        if let Some(price) = self.price.value() {
            set.insert("price", Bson::Decimal128(to_store_decimal(price)));
        }
        if let Some(status) = self.status.value() {
            set.insert("status", *status);
        }
        set.insert("updated_at", datetime_to_bson(&updated_at));
        set
    }
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.name {
            Patch::Null => errors.add("name", not_nullable()),
            Patch::Value(name) if name.is_empty() => {
                errors.add("name", rule("length", "name must not be empty"))
            }
            _ => {}
        }
        match &self.quantity {
            Patch::Null => errors.add("quantity", not_nullable()),
            Patch::Value(quantity) if *quantity < 0 => {
                errors.add("quantity", rule("range", "quantity must not be negative"))
            }
            _ => {}
        }
        match &self.price {
            Patch::Null => errors.add("price", not_nullable()),
            Patch::Value(price) => {
                if let Err(e) = non_negative_price(price) {
                    errors.add("price", e);
                }
            }
            Patch::Absent => {}
        }
        if matches!(self.status, Patch::Null) {
            errors.add("status", not_nullable());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(rule("range", "price must not be negative"));
    }
    Ok(())
}

fn not_nullable() -> ValidationError {
    rule("null", "field may be omitted but not null")
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_product_in_requires_every_field() {
        let missing_price = json!({ "name": "iPhone 15 Pro", "quantity": 1, "status": true });
        assert!(serde_json::from_value::<ProductIn>(missing_price).is_err());

        let complete = json!({
            "name": "iPhone 15 Pro", "quantity": 1, "price": "7500", "status": true
        });
        let input: ProductIn = serde_json::from_value(complete).unwrap();
        assert_eq!(input.price, Decimal::from_str("7500").unwrap());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_product_in_validation_rules() {
        let input = ProductIn {
            name: String::new(),
            quantity: -1,
            price: Decimal::from_str("-0.01").unwrap(),
            status: true,
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("quantity"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_product_out_renders_price_as_text() {
        let record = ProductRecord::new(ProductIn {
            name: "Iphone 14 Pro Max".to_string(),
            quantity: 10,
            price: Decimal::from_str("8500").unwrap(),
            status: true,
        });
        let out = ProductOut::try_from(record.clone()).unwrap();
        let body = serde_json::to_value(&out).unwrap();

        assert_eq!(body["price"], json!("8500"));
        assert_eq!(body["id"], json!(record.id.to_string()));
        assert_eq!(body["quantity"], json!(10));
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let update: ProductUpdate =
            serde_json::from_value(json!({ "price": "7500.50", "name": null })).unwrap();

        assert_eq!(update.price, Patch::Value(Decimal::from_str("7500.50").unwrap()));
        assert_eq!(update.name, Patch::Null);
        assert!(update.quantity.is_absent());
        assert!(update.status.is_absent());
        assert!(update.updated_at.is_absent());
    }

    #[test]
    fn test_update_rejects_null_for_required_fields() {
        let update: ProductUpdate = serde_json::from_value(
            json!({ "name": null, "quantity": null, "price": null, "status": null }),
        )
        .unwrap();
        let errors = update.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 4);
    }

    #[test]
    fn test_update_allows_null_updated_at() {
        let update: ProductUpdate = serde_json::from_value(json!({ "updated_at": null })).unwrap();
        assert_eq!(update.updated_at, Patch::Null);
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_set_document_contains_only_supplied_fields() {
        let update = ProductUpdate {
            price: Decimal::from_str("7500.50").unwrap().into(),
            ..Default::default()
        };
        let now = Utc::now();
        let set = update.to_set_document(now);

        assert_eq!(set.len(), 2);
        match set.get("price") {
            Some(Bson::Decimal128(stored)) => {
                assert_eq!(from_store_decimal(stored).unwrap().to_string(), "7500.50")
            }
            other => panic!("unexpected price encoding: {other:?}"),
        }
        assert_eq!(set.get("updated_at"), Some(&datetime_to_bson(&now)));
    }
}
