use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::{self, Bson, Decimal128};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{deserialize_price, to_store_decimal};
use crate::schemas::ProductIn;

/// A product as persisted in the `products` collection.
///
/// `id` is written as a BSON UUID (binary subtype 4) and the timestamps as
/// BSON dates, so stored values carry millisecond precision. Timestamps
/// produced here are truncated to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(with = "bson_uuid")]
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal128,
    pub status: bool,
    #[serde(with = "bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Fresh record with a new id and `created_at == updated_at == now`.
    pub fn new(input: ProductIn) -> Self {
        let now = store_now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            quantity: input.quantity,
            price: to_store_decimal(&input.price),
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current time at the precision the store keeps.
pub fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Filter value matching a stored `id`.
pub fn id_to_bson(id: Uuid) -> Bson {
    Bson::from(bson::Uuid::from_bytes(id.into_bytes()))
}

pub(crate) fn datetime_to_bson(value: &DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(value.timestamp_millis()))
}

mod bson_uuid {
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        bson::Uuid::from_bytes(id.into_bytes()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let id = bson::Uuid::deserialize(deserializer)?;
        Ok(Uuid::from_bytes(id.bytes()))
    }
}

mod bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        bson::DateTime::from_millis(value.timestamp_millis()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let millis = bson::DateTime::deserialize(deserializer)?.timestamp_millis();
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("timestamp {millis}ms is out of range")))
    }
}
