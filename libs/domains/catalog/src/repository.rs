use async_trait::async_trait;
use mongodb::bson::Document;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::CatalogEntity;

/// Storage for one catalog collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository<T: CatalogEntity>: Send + Sync {
    async fn insert(&self, entity: T) -> CatalogResult<()>;

    /// Delete every record, then insert `entities`; returns the inserted count
    async fn replace_all(&self, entities: Vec<T>) -> CatalogResult<u64>;

    /// Whether `slug` belongs to a record other than `except`
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> CatalogResult<bool>;

    /// Matches ordered by priority then name
    async fn find(
        &self,
        filter: Document,
        skip: Option<u64>,
        limit: Option<i64>,
    ) -> CatalogResult<Vec<T>>;

    async fn count(&self, filter: Document) -> CatalogResult<u64>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<T>>;

    async fn get_by_slug(&self, slug: &str) -> CatalogResult<Option<T>>;

    /// `$set` the given fields; returns whether a record matched
    async fn update(&self, id: Uuid, set: Document) -> CatalogResult<bool>;

    async fn delete(&self, id: Uuid) -> CatalogResult<u64>;
}
