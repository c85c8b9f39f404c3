use axum_helpers::Pagination;
use chrono::{DateTime, Utc};
use database::mongodb::{serde_timestamp, serde_uuid};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A named catalog record with a unique slug, stored in its own collection.
///
/// Brands, categories and unit types share storage, service and routing code;
/// only their fields differ.
pub trait CatalogEntity:
    Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Unpin + 'static
{
    const COLLECTION: &'static str;
    /// Capitalised name used in response messages
    const LABEL: &'static str;
    /// Lower-case name used inside error messages
    const NOUN: &'static str;

    type Create: DeserializeOwned + Validate + Debug + Send + Sync + 'static;
    type Update: Serialize
        + DeserializeOwned
        + Validate
        + Default
        + PartialEq
        + Debug
        + Send
        + Sync
        + 'static;

    fn create(input: Self::Create) -> Self;

    fn id(&self) -> Uuid;

    fn slug(&self) -> &str;

    /// Slug a create request asks for
    fn requested_slug(input: &Self::Create) -> &str;

    /// Slug an update request changes to, if any
    fn updated_slug(changes: &Self::Update) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl CatalogEntity for Brand {
    const COLLECTION: &'static str = "brands";
    const LABEL: &'static str = "Brand";
    const NOUN: &'static str = "brand";

    type Create = CreateBrand;
    type Update = UpdateBrand;

    fn create(input: CreateBrand) -> Self {
        let now = serde_timestamp::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            image: input.image,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn requested_slug(input: &CreateBrand) -> &str {
        &input.slug
    }

    fn updated_slug(changes: &UpdateBrand) -> Option<&str> {
        changes.slug.as_deref()
    }
}

/// Top-level category, or a sub-category when `parent` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    #[serde(default, with = "serde_uuid::option")]
    pub parent: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default, with = "serde_uuid::option", skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl CatalogEntity for Category {
    const COLLECTION: &'static str = "categories";
    const LABEL: &'static str = "Category";
    const NOUN: &'static str = "category";

    type Create = CreateCategory;
    type Update = UpdateCategory;

    fn create(input: CreateCategory) -> Self {
        let now = serde_timestamp::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            parent: input.parent,
            description: input.description,
            image: input.image,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn requested_slug(input: &CreateCategory) -> &str {
        &input.slug
    }

    fn updated_slug(changes: &UpdateCategory) -> Option<&str> {
        changes.slug.as_deref()
    }
}

/// Sales unit such as "Strip (10 tablets)"; price tiers point at these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitType {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub unit_quantity: f64,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitType {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    #[validate(range(min = 0.0))]
    pub unit_quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub unit_quantity: Option<f64>,
}

impl CatalogEntity for UnitType {
    const COLLECTION: &'static str = "unit_types";
    const LABEL: &'static str = "Unit type";
    const NOUN: &'static str = "unit type";

    type Create = CreateUnitType;
    type Update = UpdateUnitType;

    fn create(input: CreateUnitType) -> Self {
        let now = serde_timestamp::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            unit_quantity: input.unit_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn requested_slug(input: &CreateUnitType) -> &str {
        &input.slug
    }

    fn updated_slug(changes: &UpdateUnitType) -> Option<&str> {
        changes.slug.as_deref()
    }
}

/// Body of `POST /{entity}/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CatalogSearch {
    /// Whitespace/comma separated tokens matched against name and slug
    #[validate(length(min = 1, max = 200))]
    pub q: String,
    #[serde(default)]
    #[validate(nested)]
    pub paginate: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};
    use serde_json::json;

    #[test]
    fn test_brand_is_stored_with_string_id_and_camel_case() {
        let brand = Brand::create(CreateBrand {
            name: "Square".into(),
            slug: "square".into(),
            description: None,
            image: None,
            priority: Some(3),
        });

        let doc = bson::to_document(&brand).unwrap();
        assert_eq!(doc.get("_id"), Some(&Bson::String(brand.id.to_string())));
        assert!(doc.contains_key("createdAt"));
        assert!(!doc.contains_key("description"));

        let back: Brand = bson::from_document(doc).unwrap();
        assert_eq!(back, brand);
    }

    #[test]
    fn test_category_parent_is_optional_string() {
        let parent = Uuid::now_v7();
        let input: CreateCategory = serde_json::from_value(json!({
            "name": "Pain relief",
            "slug": "pain-relief",
            "parent": parent.to_string(),
        }))
        .unwrap();
        let category = Category::create(input);
        assert_eq!(category.parent, Some(parent));

        let doc = bson::to_document(&category).unwrap();
        assert_eq!(doc.get_str("parent").unwrap(), parent.to_string());
    }

    #[test]
    fn test_unit_type_requires_non_negative_quantity() {
        let input: CreateUnitType = serde_json::from_value(json!({
            "name": "Strip",
            "slug": "strip",
            "unitQuantity": -1.0,
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_serializes_only_supplied_fields() {
        let changes = UpdateUnitType {
            unit_quantity: Some(10.0),
            ..Default::default()
        };
        let doc = bson::to_document(&changes).unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["unitQuantity"]);
        assert_eq!(UnitType::updated_slug(&changes), None);
    }

    #[test]
    fn test_search_requires_text() {
        let search = CatalogSearch {
            q: String::new(),
            paginate: None,
        };
        assert!(search.validate().is_err());
    }
}
