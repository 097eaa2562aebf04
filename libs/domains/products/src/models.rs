use chrono::{DateTime, SubsecRound, Utc};
use query_builder::{FieldKind, FieldValue, QueryField, Queryable};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 20;

/// Product entity as stored in MongoDB and returned by the API.
///
/// `_id` and `createdAt` are assigned once at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v7), stored as `_id`
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    /// 3-20 characters
    pub title: String,
    /// 50-2000 inclusive
    pub price: f64,
    /// 0-5 inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub description: String,
    /// Creation time, millisecond precision
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(range(
        min = 50.0,
        max = 2000.0,
        message = "Price must be between 50 and 2000"
    ))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    #[serde(default)]
    pub rating: Option<f64>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
}

/// DTO for replacing every mutable field of a product (PUT)
///
/// Fields left out of the body are not kept: a missing `rating` clears it.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ReplaceProduct {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(range(
        min = 50.0,
        max = 2000.0,
        message = "Price must be between 50 and 2000"
    ))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    #[serde(default)]
    pub rating: Option<f64>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
}

/// Response body of `GET /products/count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductCount {
    pub count: u64,
}

impl Product {
    /// Create a new product from a validated DTO.
    pub fn new(input: CreateProduct) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            price: input.price,
            rating: input.rating,
            description: input.description.trim().to_string(),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Overwrite the mutable fields, keeping `id` and `created_at`.
    pub fn apply_replacement(&mut self, replacement: ReplaceProduct) {
        let ReplaceProduct {
            title,
            price,
            rating,
            description,
        } = replacement.normalized();
        self.title = title;
        self.price = price;
        self.rating = rating;
        self.description = description;
    }
}

impl ReplaceProduct {
    /// Trim surrounding whitespace from the text fields.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let chars = title.trim().chars().count();
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
        return Ok(());
    }

    let mut error = ValidationError::new("length").with_message(
        format!(
            "Title must be between {} and {} characters",
            TITLE_MIN_CHARS, TITLE_MAX_CHARS
        )
        .into(),
    );
    error.add_param("min".into(), &TITLE_MIN_CHARS);
    error.add_param("max".into(), &TITLE_MAX_CHARS);
    error.add_param("value".into(), &title);
    Err(error)
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message("Must not be empty".into()))
    } else {
        Ok(())
    }
}

/// Fields of [`Product`] that can be filtered, sorted and projected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString,
)]
pub enum ProductField {
    #[strum(to_string = "_id", serialize = "id")]
    Id,
    #[strum(to_string = "title")]
    Title,
    #[strum(to_string = "price")]
    Price,
    #[strum(to_string = "rating")]
    Rating,
    #[strum(to_string = "description")]
    Description,
    #[strum(to_string = "createdAt")]
    CreatedAt,
}

impl QueryField for ProductField {
    fn all() -> &'static [Self] {
        &[
            ProductField::Id,
            ProductField::Title,
            ProductField::Price,
            ProductField::Rating,
            ProductField::Description,
            ProductField::CreatedAt,
        ]
    }

    fn identifier() -> Self {
        ProductField::Id
    }

    fn kind(self) -> FieldKind {
        match self {
            ProductField::Id => FieldKind::Identifier,
            ProductField::Title | ProductField::Description => FieldKind::Text,
            ProductField::Price | ProductField::Rating => FieldKind::Number,
            ProductField::CreatedAt => FieldKind::Timestamp,
        }
    }

    fn key(self) -> &'static str {
        match self {
            ProductField::Id => "_id",
            ProductField::Title => "title",
            ProductField::Price => "price",
            ProductField::Rating => "rating",
            ProductField::Description => "description",
            ProductField::CreatedAt => "createdAt",
        }
    }
}

impl Queryable for Product {
    type Field = ProductField;

    fn field_value(&self, field: ProductField) -> Option<FieldValue> {
        match field {
            ProductField::Id => Some(FieldValue::Id(self.id)),
            ProductField::Title => Some(FieldValue::Text(self.title.clone())),
            ProductField::Price => Some(FieldValue::Number(self.price)),
            ProductField::Rating => self.rating.map(FieldValue::Number),
            ProductField::Description => Some(FieldValue::Text(self.description.clone())),
            ProductField::CreatedAt => Some(FieldValue::Timestamp(self.created_at)),
        }
    }
}

/// Ids travel as hyphenated strings, both in JSON and in BSON documents.
mod uuid_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

/// RFC 3339 with fixed millisecond precision; see `query_builder::format_timestamp`.
mod timestamp {
    use chrono::{DateTime, Utc};
    use query_builder::format_timestamp;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(title: &str, price: f64, rating: Option<f64>, description: &str) -> CreateProduct {
        CreateProduct {
            title: title.to_string(),
            price,
            rating,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_new_product_trims_and_stamps() {
        let product = Product::new(create("  Pen  ", 100.0, Some(4.0), " blue pen "));

        assert_eq!(product.title, "Pen");
        assert_eq!(product.description, "blue pen");
        assert_eq!(product.id.get_version_num(), 7);
        assert_eq!(product.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_create_validation_bounds() {
        assert!(create("Pen", 100.0, Some(4.0), "blue pen").validate().is_ok());
        assert!(create("Pen", 50.0, None, "x").validate().is_ok());
        assert!(create("Pen", 2000.0, Some(0.0), "x").validate().is_ok());

        let errors = create("ab", 49.99, Some(5.5), "  ").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("rating"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_title_length_counts_trimmed_characters() {
        assert!(validate_title("  ab  ").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title("a".repeat(20).as_str()).is_ok());
        assert!(validate_title("a".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut product = Product::new(create("Pen", 100.0, None, "blue pen"));
        product.created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["_id"], json!(product.id.to_string()));
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00.000Z");
        assert!(value.get("rating").is_none());
        assert!(value.get("id").is_none());

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_replacement_keeps_identity() {
        let mut product = Product::new(create("Pen", 100.0, Some(4.0), "blue pen"));
        let (id, created_at) = (product.id, product.created_at);

        product.apply_replacement(ReplaceProduct {
            title: " Marker ".to_string(),
            price: 150.0,
            rating: None,
            description: "red".to_string(),
        });

        assert_eq!(product.id, id);
        assert_eq!(product.created_at, created_at);
        assert_eq!(product.title, "Marker");
        assert_eq!(product.rating, None);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ProductField::parse_name("price").unwrap(), ProductField::Price);
        assert_eq!(ProductField::parse_name("id").unwrap(), ProductField::Id);
        assert_eq!(ProductField::parse_name("_id").unwrap(), ProductField::Id);
        assert_eq!(ProductField::parse_name("createdAt").unwrap(), ProductField::CreatedAt);
        assert!(ProductField::parse_name("colour").is_err());
    }
}
