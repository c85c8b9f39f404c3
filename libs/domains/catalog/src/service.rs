//! Catalog Service - rules shared by brands, categories and unit types

use database::mongodb::token_search;
use mongodb::bson::{self, doc};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogEntity, CatalogSearch};
use crate::repository::CatalogRepository;

/// Fields the catalog search matches tokens against
pub const SEARCH_FIELDS: [&str; 2] = ["name", "slug"];

pub struct CatalogService<T: CatalogEntity, R: CatalogRepository<T>> {
    repository: Arc<R>,
    _entity: PhantomData<T>,
}

impl<T: CatalogEntity, R: CatalogRepository<T>> CatalogService<T, R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            _entity: PhantomData,
        }
    }

    #[instrument(skip(self, input), fields(collection = T::COLLECTION))]
    pub async fn add(&self, input: T::Create) -> CatalogResult<T> {
        input.validate()?;

        let slug = T::requested_slug(&input);
        if self.repository.slug_exists(slug, None).await? {
            return Err(CatalogError::slug_taken(T::NOUN, slug));
        }

        let entity = T::create(input);
        self.repository.insert(entity.clone()).await?;
        Ok(entity)
    }

    /// Replace the collection; the batch is checked before anything is deleted
    #[instrument(skip(self, inputs), fields(collection = T::COLLECTION, count = inputs.len()))]
    pub async fn import(&self, inputs: Vec<T::Create>) -> CatalogResult<u64> {
        let mut seen = HashSet::new();
        for input in &inputs {
            input.validate()?;
            let slug = T::requested_slug(input);
            if !seen.insert(slug.to_string()) {
                return Err(CatalogError::DuplicateInBatch(slug.to_string()));
            }
        }

        let entities = inputs.into_iter().map(T::create).collect();
        self.repository.replace_all(entities).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn list(&self) -> CatalogResult<(Vec<T>, u64)> {
        let entities = self.repository.find(doc! {}, None, None).await?;
        let count = entities.len() as u64;
        Ok((entities, count))
    }

    /// Token search over name and slug; `count` is the unpaged total
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn search(&self, request: CatalogSearch) -> CatalogResult<(Vec<T>, u64)> {
        request.validate()?;

        let filter = token_search(&request.q, &SEARCH_FIELDS).unwrap_or_default();
        let (skip, limit) = match request.paginate {
            Some(page) => (Some(page.skip()), Some(page.limit())),
            None => (None, None),
        };

        let entities = self.repository.find(filter.clone(), skip, limit).await?;
        let count = self.repository.count(filter).await?;
        Ok((entities, count))
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<T>> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn get_by_slug(&self, slug: &str) -> CatalogResult<Option<T>> {
        self.repository.get_by_slug(slug).await
    }

    /// Partial update; returns whether a record matched
    #[instrument(skip(self, changes), fields(collection = T::COLLECTION))]
    pub async fn update(&self, id: Uuid, changes: T::Update) -> CatalogResult<bool> {
        changes.validate()?;

        if let Some(slug) = T::updated_slug(&changes) {
            if self.repository.slug_exists(slug, Some(id)).await? {
                return Err(CatalogError::slug_taken(T::NOUN, slug));
            }
        }
        if changes == T::Update::default() {
            return Ok(self.repository.get_by_id(id).await?.is_some());
        }

        let set = bson::to_document(&changes)?;
        self.repository.update(id, set).await
    }

    /// Succeeds whether or not a record matched
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        self.repository.delete(id).await?;
        Ok(())
    }
}
