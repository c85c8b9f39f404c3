use chrono::{DateTime, Utc};
use database::mongodb::{serde_timestamp, serde_uuid};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Price for one unit of sale, e.g. a strip or a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// Unit type this tier is sold in
    #[serde(with = "serde_uuid")]
    pub unit: Uuid,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Product document stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Sequential, zero-padded to at least four digits
    pub sku: String,
    pub price: f64,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub brand: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub generic: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_slug: Option<String>,
    #[serde(default)]
    pub prices: Vec<PriceTier>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form attributes such as strength or dosage form
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: serde_json::Value,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /product` and each element of a bulk import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default, with = "serde_uuid::option")]
    pub brand: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option")]
    pub category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option")]
    pub sub_category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option")]
    pub generic: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option")]
    pub unit_type: Option<Uuid>,
    #[serde(default)]
    pub brand_slug: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub sub_category_slug: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub prices: Vec<PriceTier>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: serde_json::Value,
}

/// Partial update; only supplied fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub brand: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub generic: Option<Uuid>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub prices: Option<Vec<PriceTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        *self == UpdateProduct::default()
    }
}

/// One element of `PUT /product/bulk`; `changes` is validated per item by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdateItem {
    #[serde(rename = "_id", alias = "id", with = "serde_uuid")]
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: UpdateProduct,
}

/// A bulk update entry that could not be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FailedUpdate {
    pub id: Uuid,
    pub reason: String,
}

/// Outcome of a bulk update; every item is attempted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatchUpdateReport {
    pub requested: usize,
    pub updated: usize,
    pub failed: Vec<FailedUpdate>,
}

/// Cheapest and most expensive price among matching products
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceRange {
    /// Missing bounds (nothing matched) read as zero
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min_price: min.unwrap_or(0.0),
            max_price: max.unwrap_or(0.0),
        }
    }
}

/// Body of `POST /product/by-ids`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ProductIds {
    #[validate(length(max = 1000))]
    pub ids: Vec<Uuid>,
}

/// Body of `POST /product/recommended`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRequest {
    /// Products already shown; never returned
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub sub_category_ids: Vec<Uuid>,
}

impl Product {
    /// Build a new document; `sku` is reserved by the caller
    pub fn new(input: CreateProduct, sku: String) -> Self {
        let now = serde_timestamp::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            sku,
            price: input.price,
            brand: input.brand,
            category: input.category,
            sub_category: input.sub_category,
            generic: input.generic,
            unit_type: input.unit_type,
            brand_slug: input.brand_slug,
            category_slug: input.category_slug,
            sub_category_slug: input.sub_category_slug,
            prices: input.prices,
            images: input.images,
            tags: input.tags,
            attributes: input.attributes,
            created_at: now,
            updated_at: now,
        }
    }
}
