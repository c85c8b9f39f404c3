//! Dereferencing of product references into embedded summaries.
//!
//! The repository loads every referenced brand, category, generic and unit
//! type in one `$in` query per collection; [`ReferenceIndex::assemble`] then
//! builds the response shape without further database access.

use chrono::{DateTime, Utc};
use database::mongodb::{serde_timestamp, serde_uuid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{PriceTier, Product};

pub const BRANDS_COLLECTION: &str = "brands";
pub const CATEGORIES_COLLECTION: &str = "categories";
pub const GENERICS_COLLECTION: &str = "generics";
pub const UNIT_TYPES_COLLECTION: &str = "unit_types";

/// Embedded summary of a brand, category or generic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reference {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Embedded summary of a unit type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitRef {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub unit_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTierView {
    /// `null` when the unit type no longer exists
    pub unit: Option<UnitRef>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Product as returned by read endpoints, with references resolved
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub price: f64,
    pub brand: Option<Reference>,
    pub category: Option<Reference>,
    pub sub_category: Option<Reference>,
    pub generic: Option<Reference>,
    pub unit_type: Option<UnitRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_slug: Option<String>,
    pub prices: Vec<PriceTierView>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    #[schema(value_type = Object)]
    pub attributes: serde_json::Value,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Ids to fetch, grouped by collection and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIds {
    pub brands: Vec<Uuid>,
    /// Categories and sub-categories share a collection
    pub categories: Vec<Uuid>,
    pub generics: Vec<Uuid>,
    pub unit_types: Vec<Uuid>,
}

impl ReferenceIds {
    pub fn collect(products: &[Product]) -> Self {
        let mut brands = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut generics = BTreeSet::new();
        let mut unit_types = BTreeSet::new();

        for product in products {
            brands.extend(product.brand);
            categories.extend(product.category);
            categories.extend(product.sub_category);
            generics.extend(product.generic);
            unit_types.extend(product.unit_type);
            unit_types.extend(product.prices.iter().map(|tier| tier.unit));
        }

        Self {
            brands: brands.into_iter().collect(),
            categories: categories.into_iter().collect(),
            generics: generics.into_iter().collect(),
            unit_types: unit_types.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
            && self.categories.is_empty()
            && self.generics.is_empty()
            && self.unit_types.is_empty()
    }
}

/// Loaded reference documents keyed by id
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    brands: HashMap<Uuid, Reference>,
    categories: HashMap<Uuid, Reference>,
    generics: HashMap<Uuid, Reference>,
    unit_types: HashMap<Uuid, UnitRef>,
}

fn keyed(items: Vec<Reference>) -> HashMap<Uuid, Reference> {
    items.into_iter().map(|item| (item.id, item)).collect()
}

impl ReferenceIndex {
    pub fn new(
        brands: Vec<Reference>,
        categories: Vec<Reference>,
        generics: Vec<Reference>,
        unit_types: Vec<UnitRef>,
    ) -> Self {
        Self {
            brands: keyed(brands),
            categories: keyed(categories),
            generics: keyed(generics),
            unit_types: unit_types.into_iter().map(|unit| (unit.id, unit)).collect(),
        }
    }

    /// Dangling references resolve to `None`
    pub fn assemble(&self, product: Product) -> ProductView {
        let lookup = |map: &HashMap<Uuid, Reference>, id: Option<Uuid>| {
            id.and_then(|id| map.get(&id).cloned())
        };

        ProductView {
            brand: lookup(&self.brands, product.brand),
            category: lookup(&self.categories, product.category),
            sub_category: lookup(&self.categories, product.sub_category),
            generic: lookup(&self.generics, product.generic),
            unit_type: product
                .unit_type
                .and_then(|id| self.unit_types.get(&id).cloned()),
            prices: product
                .prices
                .into_iter()
                .map(|tier| self.tier(tier))
                .collect(),
            id: product.id,
            name: product.name,
            slug: product.slug,
            sku: product.sku,
            price: product.price,
            brand_slug: product.brand_slug,
            category_slug: product.category_slug,
            sub_category_slug: product.sub_category_slug,
            images: product.images,
            tags: product.tags,
            attributes: product.attributes,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }

    fn tier(&self, tier: PriceTier) -> PriceTierView {
        PriceTierView {
            unit: self.unit_types.get(&tier.unit).cloned(),
            price: tier.price,
            discounted_price: tier.discounted_price,
            quantity: tier.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;
    use serde_json::json;

    fn reference(name: &str) -> Reference {
        Reference {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: name.to_lowercase(),
        }
    }

    fn product(brand: &Reference, category: &Reference, unit: &UnitRef) -> Product {
        let input: CreateProduct = serde_json::from_value(json!({
            "name": "Napa",
            "slug": "napa",
            "price": 1.2,
            "brand": brand.id.to_string(),
            "category": category.id.to_string(),
            "subCategory": Uuid::now_v7().to_string(),
            "prices": [{ "unit": unit.id.to_string(), "price": 1.2 }]
        }))
        .unwrap();
        Product::new(input, "0001".into())
    }

    #[test]
    fn test_collect_deduplicates_ids() {
        let brand = reference("Beximco");
        let category = reference("Medicine");
        let unit = UnitRef {
            id: Uuid::now_v7(),
            name: "Strip".into(),
            unit_quantity: 10.0,
        };
        let products = vec![
            product(&brand, &category, &unit),
            product(&brand, &category, &unit),
        ];

        let ids = ReferenceIds::collect(&products);
        assert_eq!(ids.brands, vec![brand.id]);
        assert_eq!(ids.categories.len(), 3);
        assert_eq!(ids.unit_types, vec![unit.id]);
        assert!(ids.generics.is_empty());
        assert!(!ids.is_empty());
        assert!(ReferenceIds::collect(&[]).is_empty());
    }

    #[test]
    fn test_assemble_resolves_known_references() {
        let brand = reference("Beximco");
        let category = reference("Medicine");
        let unit = UnitRef {
            id: Uuid::now_v7(),
            name: "Strip".into(),
            unit_quantity: 10.0,
        };
        let product = product(&brand, &category, &unit);
        let index = ReferenceIndex::new(
            vec![brand.clone()],
            vec![category.clone()],
            vec![],
            vec![unit.clone()],
        );

        let view = index.assemble(product.clone());
        assert_eq!(view.id, product.id);
        assert_eq!(view.brand, Some(brand));
        assert_eq!(view.category, Some(category));
        assert_eq!(view.sub_category, None);
        assert_eq!(view.prices[0].unit, Some(unit));
    }

    #[test]
    fn test_view_serializes_populated_unit() {
        let unit = UnitRef {
            id: Uuid::now_v7(),
            name: "Box".into(),
            unit_quantity: 100.0,
        };
        let value = serde_json::to_value(PriceTierView {
            unit: Some(unit.clone()),
            price: 4.0,
            discounted_price: None,
            quantity: None,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "unit": { "_id": unit.id.to_string(), "name": "Box", "unitQuantity": 100.0 },
                "price": 4.0
            })
        );
    }
}
