//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::{
    is_duplicate_key, reserve_sequence, serde_timestamp, timestamp_string, uuid_array, uuid_bson,
};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, UpdateProduct};
use crate::populate::{
    Reference, ReferenceIds, ReferenceIndex, UnitRef, BRANDS_COLLECTION, CATEGORIES_COLLECTION,
    GENERICS_COLLECTION, UNIT_TYPES_COLLECTION,
};
use crate::query::{CompiledQuery, SortDirection};
use crate::repository::ProductRepository;
use crate::sampler::sample_pipeline;
use crate::sku::{format_sku, SKU_SEQUENCE};

pub const PRODUCTS_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    db: Database,
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<Product>(PRODUCTS_COLLECTION),
        }
    }

    /// Unique slug and SKU, plus the fields filters and samples hit most
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let unique = |name: &str| {
            IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .build()
        };
        let named = |name: &str| IndexOptions::builder().name(name.to_string()).build();

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(unique("idx_slug_unique"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "sku": 1 })
                .options(unique("idx_sku_unique"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(named("idx_price"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "generic": 1 })
                .options(named("idx_generic"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "subCategory": 1 })
                .options(named("idx_sub_category"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "categorySlug": 1, "price": 1 })
                .options(named("idx_category_slug_price"))
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    async fn fetch_refs<T>(
        &self,
        collection: &str,
        ids: &[Uuid],
        projection: Document,
    ) -> ProductResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let options = FindOptions::builder().projection(projection).build();
        let cursor = self
            .db
            .collection::<T>(collection)
            .find(doc! { "_id": { "$in": uuid_array(ids) } })
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": uuid_bson(&id) }
}

fn find_options(query: &CompiledQuery) -> FindOptions {
    FindOptions::builder()
        .sort(query.sort.clone())
        .skip(query.skip)
        .limit(query.limit)
        .build()
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id, slug = %product.slug))]
    async fn insert(&self, product: Product) -> ProductResult<()> {
        match self.collection.insert_one(&product).await {
            Ok(_) => {
                tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(ProductError::SlugTaken(product.slug)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn replace_all(&self, products: Vec<Product>) -> ProductResult<u64> {
        let removed = self.collection.delete_many(doc! {}).await?;
        tracing::info!(removed = removed.deleted_count, "Products cleared for import");

        if products.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(&products).await?;
        let inserted = result.inserted_ids.len() as u64;
        tracing::info!(inserted, "Products imported");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> ProductResult<bool> {
        let mut filter = doc! { "slug": slug };
        if let Some(id) = except {
            filter.insert("_id", doc! { "$ne": uuid_bson(&id) });
        }
        let count = self.collection.count_documents(filter).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn next_skus(&self, count: u64) -> ProductResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let block = reserve_sequence(&self.db, SKU_SEQUENCE, count).await?;
        Ok(block.map(format_sku).collect())
    }

    #[instrument(skip(self))]
    async fn find(&self, query: &CompiledQuery) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(query.filter.clone())
            .with_options(find_options(query))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &Document) -> ProductResult<u64> {
        Ok(self.collection.count_documents(filter.clone()).await?)
    }

    #[instrument(skip(self))]
    async fn price_extreme(
        &self,
        filter: &Document,
        direction: SortDirection,
    ) -> ProductResult<Option<f64>> {
        let order = match direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        let options = FindOptions::builder()
            .sort(doc! { "price": order })
            .projection(doc! { "price": 1 })
            .limit(1_i64)
            .build();

        let mut cursor = self
            .db
            .collection::<Document>(PRODUCTS_COLLECTION)
            .find(filter.clone())
            .with_options(options)
            .await?;

        let Some(first) = cursor.try_next().await? else {
            return Ok(None);
        };
        let price = match first.get("price") {
            Some(bson::Bson::Double(p)) => Some(*p),
            Some(bson::Bson::Int32(p)) => Some(f64::from(*p)),
            Some(bson::Bson::Int64(p)) => Some(*p as f64),
            _ => None,
        };
        Ok(price)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(by_id(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": uuid_array(ids) } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: &UpdateProduct) -> ProductResult<bool> {
        let mut set = bson::to_document(changes)?;
        set.insert("updatedAt", timestamp_string(&serde_timestamp::now()));

        let result = match self
            .collection
            .update_one(by_id(id), doc! { "$set": set })
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => {
                return Err(ProductError::SlugTaken(
                    changes.slug.clone().unwrap_or_default(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(product_id = %id, matched = result.matched_count, "Product updated");
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<u64> {
        let result = self.collection.delete_one(by_id(id)).await?;
        tracing::info!(product_id = %id, deleted = result.deleted_count, "Product deleted");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn sample(&self, filter: Document, size: i64) -> ProductResult<Vec<Product>> {
        let mut cursor = self.collection.aggregate(sample_pipeline(filter, size)).await?;

        let mut products = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            products.push(bson::from_document::<Product>(document)?);
        }
        Ok(products)
    }

    #[instrument(skip(self, ids))]
    async fn load_references(&self, ids: &ReferenceIds) -> ProductResult<ReferenceIndex> {
        let summary = doc! { "name": 1, "slug": 1 };

        let brands: Vec<Reference> = self
            .fetch_refs(BRANDS_COLLECTION, &ids.brands, summary.clone())
            .await?;
        let categories: Vec<Reference> = self
            .fetch_refs(CATEGORIES_COLLECTION, &ids.categories, summary.clone())
            .await?;
        let generics: Vec<Reference> = self
            .fetch_refs(GENERICS_COLLECTION, &ids.generics, summary)
            .await?;
        let unit_types: Vec<UnitRef> = self
            .fetch_refs(
                UNIT_TYPES_COLLECTION,
                &ids.unit_types,
                doc! { "name": 1, "unitQuantity": 1 },
            )
            .await?;

        Ok(ReferenceIndex::new(brands, categories, generics, unit_types))
    }
}
