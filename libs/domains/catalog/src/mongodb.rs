//! MongoDB implementation of CatalogRepository

use async_trait::async_trait;
use database::mongodb::{is_duplicate_key, serde_timestamp, timestamp_string, uuid_bson};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use std::marker::PhantomData;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::CatalogEntity;
use crate::repository::CatalogRepository;

pub struct MongoCatalogRepository<T: CatalogEntity> {
    collection: Collection<T>,
    _entity: PhantomData<T>,
}

impl<T: CatalogEntity> MongoCatalogRepository<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<T>(T::COLLECTION),
            _entity: PhantomData,
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_slug_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(slug_index).await?;
        tracing::info!(collection = T::COLLECTION, "Catalog indexes created successfully");
        Ok(())
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": uuid_bson(&id) }
}

fn listing_options(skip: Option<u64>, limit: Option<i64>) -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "priority": -1, "name": 1 })
        .skip(skip)
        .limit(limit)
        .build()
}

#[async_trait]
impl<T: CatalogEntity> CatalogRepository<T> for MongoCatalogRepository<T> {
    #[instrument(skip(self, entity), fields(collection = T::COLLECTION, slug = %entity.slug()))]
    async fn insert(&self, entity: T) -> CatalogResult<()> {
        match self.collection.insert_one(&entity).await {
            Ok(_) => {
                tracing::info!(id = %entity.id(), "{} created", T::LABEL);
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(CatalogError::slug_taken(T::NOUN, entity.slug())),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, entities), fields(collection = T::COLLECTION, count = entities.len()))]
    async fn replace_all(&self, entities: Vec<T>) -> CatalogResult<u64> {
        let removed = self.collection.delete_many(doc! {}).await?;
        tracing::info!(removed = removed.deleted_count, "Collection cleared for import");

        if entities.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(&entities).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> CatalogResult<bool> {
        let mut filter = doc! { "slug": slug };
        if let Some(id) = except {
            filter.insert("_id", doc! { "$ne": uuid_bson(&id) });
        }
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find(
        &self,
        filter: Document,
        skip: Option<u64>,
        limit: Option<i64>,
    ) -> CatalogResult<Vec<T>> {
        let cursor = self
            .collection
            .find(filter)
            .with_options(listing_options(skip, limit))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn count(&self, filter: Document) -> CatalogResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<T>> {
        Ok(self.collection.find_one(by_id(id)).await?)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get_by_slug(&self, slug: &str) -> CatalogResult<Option<T>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    #[instrument(skip(self, set), fields(collection = T::COLLECTION))]
    async fn update(&self, id: Uuid, mut set: Document) -> CatalogResult<bool> {
        let slug = set.get_str("slug").map(str::to_string).unwrap_or_default();
        set.insert("updatedAt", timestamp_string(&serde_timestamp::now()));

        match self
            .collection
            .update_one(by_id(id), doc! { "$set": set })
            .await
        {
            Ok(result) => {
                tracing::info!(%id, matched = result.matched_count, "{} updated", T::LABEL);
                Ok(result.matched_count > 0)
            }
            Err(e) if is_duplicate_key(&e) => Err(CatalogError::slug_taken(T::NOUN, slug)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: Uuid) -> CatalogResult<u64> {
        let result = self.collection.delete_one(by_id(id)).await?;
        tracing::info!(%id, deleted = result.deleted_count, "{} deleted", T::LABEL);
        Ok(result.deleted_count)
    }
}
