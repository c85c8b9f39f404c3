use async_trait::async_trait;
use mongodb::bson::Document;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, UpdateProduct};
use crate::populate::{ReferenceIds, ReferenceIndex};
use crate::query::{CompiledQuery, SortDirection};

/// Persistence for products and the lookups they depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> ProductResult<()>;

    /// Delete every product, then insert `products`; returns the inserted count
    async fn replace_all(&self, products: Vec<Product>) -> ProductResult<u64>;

    /// Whether `slug` belongs to a product other than `except`
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> ProductResult<bool>;

    /// Reserve `count` consecutive SKUs from the shared counter
    async fn next_skus(&self, count: u64) -> ProductResult<Vec<String>>;

    async fn find(&self, query: &CompiledQuery) -> ProductResult<Vec<Product>>;

    async fn count(&self, filter: &Document) -> ProductResult<u64>;

    /// Price of the first match when sorted by price in `direction`
    async fn price_extreme(
        &self,
        filter: &Document,
        direction: SortDirection,
    ) -> ProductResult<Option<f64>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>>;

    async fn get_many(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>>;

    /// `$set` the supplied fields; returns whether a product matched
    async fn update(&self, id: Uuid, changes: &UpdateProduct) -> ProductResult<bool>;

    /// Returns the number of deleted documents (0 or 1)
    async fn delete(&self, id: Uuid) -> ProductResult<u64>;

    /// Uniform random sample of at most `size` matches
    async fn sample(&self, filter: Document, size: i64) -> ProductResult<Vec<Product>>;

    async fn load_references(&self, ids: &ReferenceIds) -> ProductResult<ReferenceIndex>;
}
