//! Small record type shared by the unit tests of this crate.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::field::{FieldKind, FieldValue, QueryField, Queryable};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: &'static str,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString,
)]
pub enum ItemField {
    #[strum(to_string = "_id", serialize = "id")]
    Id,
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "price")]
    Price,
    #[strum(to_string = "rating")]
    Rating,
    #[strum(to_string = "createdAt")]
    CreatedAt,
}

impl QueryField for ItemField {
    fn all() -> &'static [Self] {
        &[
            ItemField::Id,
            ItemField::Name,
            ItemField::Price,
            ItemField::Rating,
            ItemField::CreatedAt,
        ]
    }

    fn identifier() -> Self {
        ItemField::Id
    }

    fn kind(self) -> FieldKind {
        match self {
            ItemField::Id => FieldKind::Identifier,
            ItemField::Name => FieldKind::Text,
            ItemField::Price | ItemField::Rating => FieldKind::Number,
            ItemField::CreatedAt => FieldKind::Timestamp,
        }
    }

    fn key(self) -> &'static str {
        match self {
            ItemField::Id => "_id",
            ItemField::Name => "name",
            ItemField::Price => "price",
            ItemField::Rating => "rating",
            ItemField::CreatedAt => "createdAt",
        }
    }
}

impl Queryable for Item {
    type Field = ItemField;

    fn field_value(&self, field: ItemField) -> Option<FieldValue> {
        match field {
            ItemField::Id => Some(FieldValue::Id(self.id)),
            ItemField::Name => Some(FieldValue::Text(self.name.to_string())),
            ItemField::Price => Some(FieldValue::Number(self.price)),
            ItemField::Rating => self.rating.map(FieldValue::Number),
            ItemField::CreatedAt => Some(FieldValue::Timestamp(self.created_at)),
        }
    }
}

/// Five items in insertion order; `mid` and `mid-two` share a price.
pub fn items() -> Vec<Item> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    [
        ("budget", 60.0, Some(2.5)),
        ("mid", 100.0, Some(4.0)),
        ("mid-two", 100.0, Some(4.5)),
        ("premium", 900.0, Some(5.0)),
        ("unrated", 300.0, None),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, price, rating))| Item {
        id: Uuid::from_u128(i as u128 + 1),
        name,
        price,
        rating,
        created_at: base + Duration::days(i as i64),
    })
    .collect()
}
