//! Product Service - Business logic layer

use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    BatchUpdateReport, BulkUpdateItem, CreateProduct, FailedUpdate, PriceRange, Product,
    RecommendedRequest, UpdateProduct,
};
use crate::populate::{ProductView, ReferenceIds, ReferenceIndex};
use crate::query::{CompiledQuery, ProductQuery, SortDirection};
use crate::repository::ProductRepository;
use crate::sampler::{sample_filter, GroupingKey, RECOMMENDED_SAMPLE_SIZE, RELATED_SAMPLE_SIZE};

/// One page of products plus the unpaged match count
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub data: Vec<ProductView>,
    pub count: u64,
}

/// A page together with the price bounds of the whole match set
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPage {
    pub page: ProductPage,
    pub price_range: PriceRange,
}

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a product with the next SKU; a taken slug is rejected before anything is written
    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn add_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        if self.repository.slug_exists(&input.slug, None).await? {
            return Err(ProductError::SlugTaken(input.slug));
        }

        let sku = self
            .repository
            .next_skus(1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProductError::Database("SKU counter returned no value".into()))?;

        let product = Product::new(input, sku);
        self.repository.insert(product.clone()).await?;
        Ok(product)
    }

    /// Replace the whole collection with `inputs`, each with a fresh SKU
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn import_products(&self, inputs: Vec<CreateProduct>) -> ProductResult<u64> {
        let mut seen = HashSet::new();
        for input in &inputs {
            input.validate()?;
            if !seen.insert(input.slug.as_str()) {
                return Err(ProductError::DuplicateInBatch(input.slug.clone()));
            }
        }

        let skus = self.repository.next_skus(inputs.len() as u64).await?;
        if skus.len() != inputs.len() {
            return Err(ProductError::Database(format!(
                "reserved {} SKUs for {} products",
                skus.len(),
                inputs.len()
            )));
        }

        let products = inputs
            .into_iter()
            .zip(skus)
            .map(|(input, sku)| Product::new(input, sku))
            .collect();

        self.repository.replace_all(products).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<ProductPage> {
        query.validate()?;
        let compiled = query.compile()?;
        self.page(&compiled).await
    }

    /// Page plus min/max price over the unpaged filter
    #[instrument(skip(self))]
    pub async fn filter_products(&self, query: ProductQuery) -> ProductResult<FilteredPage> {
        query.validate()?;
        let compiled = query.compile()?;
        let price_range = self.price_bounds(&compiled.filter).await?;
        let page = self.page(&compiled).await?;
        Ok(FilteredPage { page, price_range })
    }

    #[instrument(skip(self))]
    pub async fn price_range(&self, query: ProductQuery) -> ProductResult<PriceRange> {
        let filter = query.filter_document()?;
        self.price_bounds(&filter).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductView>> {
        let product = self.repository.get_by_id(id).await?;
        Ok(self.populate(product.into_iter().collect()).await?.pop())
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<ProductView>> {
        let product = self.repository.get_by_slug(slug).await?;
        Ok(self.populate(product.into_iter().collect()).await?.pop())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_by_ids(&self, ids: &[Uuid]) -> ProductResult<Vec<ProductView>> {
        let products = self.repository.get_many(ids).await?;
        self.populate(products).await
    }

    /// Partial update; a slug owned by another product is a conflict
    #[instrument(skip(self, changes))]
    pub async fn update_product(&self, id: Uuid, changes: UpdateProduct) -> ProductResult<bool> {
        changes.validate()?;

        if let Some(slug) = &changes.slug {
            if self.repository.slug_exists(slug, Some(id)).await? {
                return Err(ProductError::SlugTaken(slug.clone()));
            }
        }
        if changes.is_empty() {
            return Ok(self.repository.get_by_id(id).await?.is_some());
        }

        let matched = self.repository.update(id, &changes).await?;
        if !matched {
            tracing::info!(product_id = %id, "Update matched no product");
        }
        Ok(matched)
    }

    /// Apply every item in order; failures are collected, never short-circuit
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn bulk_update(&self, items: Vec<BulkUpdateItem>) -> BatchUpdateReport {
        let mut report = BatchUpdateReport {
            requested: items.len(),
            ..Default::default()
        };

        for item in items {
            let id = item.id;
            match self.update_product(id, item.changes).await {
                Ok(true) => report.updated += 1,
                Ok(false) => report.failed.push(FailedUpdate {
                    id,
                    reason: ProductError::NotFound(id).to_string(),
                }),
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "Bulk update item failed");
                    report.failed.push(FailedUpdate {
                        id,
                        reason: e.public_message(),
                    });
                }
            }
        }

        report
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Up to four products sharing `generic`, never `id` itself
    #[instrument(skip(self))]
    pub async fn related_products(
        &self,
        id: Uuid,
        generic: Uuid,
    ) -> ProductResult<Vec<ProductView>> {
        let filter = sample_filter(&[id], GroupingKey::Generic(generic));
        let products = self.repository.sample(filter, RELATED_SAMPLE_SIZE).await?;
        self.populate(products).await
    }

    /// Up to six products from the given sub-categories, excluding those already shown
    #[instrument(skip(self, request))]
    pub async fn recommended_products(
        &self,
        request: RecommendedRequest,
    ) -> ProductResult<Vec<ProductView>> {
        let filter = sample_filter(
            &request.product_ids,
            GroupingKey::SubCategories(&request.sub_category_ids),
        );
        let products = self
            .repository
            .sample(filter, RECOMMENDED_SAMPLE_SIZE)
            .await?;
        self.populate(products).await
    }

    async fn page(&self, compiled: &CompiledQuery) -> ProductResult<ProductPage> {
        let products = self.repository.find(compiled).await?;
        let count = self.repository.count(&compiled.filter).await?;
        let data = self.populate(products).await?;
        Ok(ProductPage { data, count })
    }

    async fn price_bounds(&self, filter: &mongodb::bson::Document) -> ProductResult<PriceRange> {
        let min = self
            .repository
            .price_extreme(filter, SortDirection::Asc)
            .await?;
        let max = self
            .repository
            .price_extreme(filter, SortDirection::Desc)
            .await?;
        Ok(PriceRange::from_bounds(min, max))
    }

    async fn populate(&self, products: Vec<Product>) -> ProductResult<Vec<ProductView>> {
        let ids = ReferenceIds::collect(&products);
        let index = if ids.is_empty() {
            ReferenceIndex::default()
        } else {
            self.repository.load_references(&ids).await?
        };
        Ok(products
            .into_iter()
            .map(|product| index.assemble(product))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterExpr;
    use crate::populate::Reference;
    use crate::repository::MockProductRepository;
    use axum_helpers::Pagination;
    use mockall::predicate::*;
    use mongodb::bson::doc;
    use serde_json::json;

    fn input(slug: &str) -> CreateProduct {
        serde_json::from_value(json!({ "name": slug, "slug": slug, "price": 10.0 })).unwrap()
    }

    fn stored(slug: &str, price: f64) -> Product {
        let mut product = Product::new(input(slug), "0001".into());
        product.price = price;
        product
    }

    #[tokio::test]
    async fn test_add_product_assigns_sku() {
        let mut repo = MockProductRepository::new();
        repo.expect_slug_exists()
            .with(eq("napa"), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_next_skus()
            .with(eq(1))
            .returning(|_| Ok(vec!["0007".to_string()]));
        repo.expect_insert()
            .withf(|p| p.sku == "0007" && p.slug == "napa")
            .times(1)
            .returning(|_| Ok(()));

        let service = ProductService::new(repo);
        let product = service.add_product(input("napa")).await.unwrap();
        assert_eq!(product.sku, "0007");
    }

    #[tokio::test]
    async fn test_add_product_duplicate_slug_never_inserts() {
        let mut repo = MockProductRepository::new();
        repo.expect_slug_exists().returning(|_, _| Ok(true));
        repo.expect_next_skus().never();
        repo.expect_insert().never();

        let service = ProductService::new(repo);
        let err = service.add_product(input("napa")).await.unwrap_err();
        assert!(matches!(err, ProductError::SlugTaken(slug) if slug == "napa"));
    }

    #[tokio::test]
    async fn test_add_product_invalid_input_touches_nothing() {
        let repo = MockProductRepository::new();
        let service = ProductService::new(repo);
        let err = service.add_product(input("")).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_import_replaces_with_fresh_skus() {
        let mut repo = MockProductRepository::new();
        repo.expect_next_skus()
            .with(eq(3))
            .returning(|n| Ok((1..=n).map(|i| format!("{:04}", i)).collect()));
        repo.expect_replace_all()
            .withf(|products| {
                products.iter().map(|p| p.sku.as_str()).collect::<Vec<_>>()
                    == vec!["0001", "0002", "0003"]
            })
            .returning(|products| Ok(products.len() as u64));

        let service = ProductService::new(repo);
        let inserted = service
            .import_products(vec![input("a"), input("b"), input("c")])
            .await
            .unwrap();
        assert_eq!(inserted, 3);
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_slug_before_deleting() {
        let mut repo = MockProductRepository::new();
        repo.expect_next_skus().never();
        repo.expect_replace_all().never();

        let service = ProductService::new(repo);
        let err = service
            .import_products(vec![input("a"), input("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateInBatch(slug) if slug == "a"));
    }

    #[tokio::test]
    async fn test_list_counts_with_the_same_filter() {
        let query = ProductQuery {
            query: vec![FilterExpr::eq("categorySlug", "medicine")],
            paginate: Some(Pagination::new(2, 1)),
            ..Default::default()
        };
        let expected_filter = doc! { "categorySlug": { "$eq": "medicine" } };

        let mut repo = MockProductRepository::new();
        let find_filter = expected_filter.clone();
        repo.expect_find()
            .withf(move |q| q.filter == find_filter && q.limit == Some(2) && q.skip == Some(0))
            .returning(|_| Ok(vec![stored("a", 1.0), stored("b", 2.0)]));
        repo.expect_count()
            .with(eq(expected_filter))
            .returning(|_| Ok(5));
        repo.expect_load_references().never();

        let service = ProductService::new(repo);
        let page = service.list_products(query).await.unwrap();
        assert_eq!(page.count, 5);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_filter_before_querying() {
        let mut repo = MockProductRepository::new();
        repo.expect_find().never();
        repo.expect_count().never();

        let service = ProductService::new(repo);
        let query = ProductQuery {
            query: vec![FilterExpr::eq("$where", "sleep(1000)")],
            ..Default::default()
        };
        let err = service.list_products(query).await.unwrap_err();
        assert!(matches!(err, ProductError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_filter_reports_price_range() {
        let mut repo = MockProductRepository::new();
        repo.expect_price_extreme()
            .with(always(), eq(SortDirection::Asc))
            .returning(|_, _| Ok(Some(1.5)));
        repo.expect_price_extreme()
            .with(always(), eq(SortDirection::Desc))
            .returning(|_, _| Ok(Some(42.0)));
        repo.expect_find().returning(|_| Ok(vec![]));
        repo.expect_count().returning(|_| Ok(0));

        let service = ProductService::new(repo);
        let result = service.filter_products(ProductQuery::default()).await.unwrap();
        assert_eq!(result.price_range, PriceRange::from_bounds(Some(1.5), Some(42.0)));
        assert!(result.page.data.is_empty());
    }

    #[tokio::test]
    async fn test_price_range_of_empty_set_is_zero() {
        let mut repo = MockProductRepository::new();
        repo.expect_price_extreme().returning(|_, _| Ok(None));

        let service = ProductService::new(repo);
        let range = service
            .price_range(ProductQuery::search("nothing"))
            .await
            .unwrap();
        assert_eq!(range, PriceRange { min_price: 0.0, max_price: 0.0 });
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(repo);
        assert_eq!(service.get_by_id(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_by_slug_populates_brand() {
        let brand = Reference {
            id: Uuid::now_v7(),
            name: "Square".into(),
            slug: "square".into(),
        };
        let mut product = stored("napa", 1.0);
        product.brand = Some(brand.id);

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_slug()
            .with(eq("napa"))
            .returning(move |_| Ok(Some(product.clone())));
        let loaded = brand.clone();
        repo.expect_load_references()
            .withf(move |ids| ids.brands == vec![loaded.id])
            .returning(move |_| {
                Ok(ReferenceIndex::new(vec![brand.clone()], vec![], vec![], vec![]))
            });

        let service = ProductService::new(repo);
        let view = service.get_by_slug("napa").await.unwrap().unwrap();
        assert_eq!(view.brand.map(|b| b.name), Some("Square".to_string()));
    }

    #[tokio::test]
    async fn test_update_slug_conflict() {
        let id = Uuid::now_v7();
        let mut repo = MockProductRepository::new();
        repo.expect_slug_exists()
            .with(eq("taken"), eq(Some(id)))
            .returning(|_, _| Ok(true));
        repo.expect_update().never();

        let service = ProductService::new(repo);
        let changes = UpdateProduct {
            slug: Some("taken".into()),
            ..Default::default()
        };
        let err = service.update_product(id, changes).await.unwrap_err();
        assert!(matches!(err, ProductError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn test_bulk_update_reports_each_item() {
        let ok = Uuid::now_v7();
        let missing = Uuid::now_v7();
        let broken = Uuid::now_v7();

        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .with(eq(ok), always())
            .returning(|_, _| Ok(true));
        repo.expect_update()
            .with(eq(missing), always())
            .returning(|_, _| Ok(false));
        repo.expect_update()
            .with(eq(broken), always())
            .returning(|_, _| Err(ProductError::Database("timeout on 10.0.0.4".into())));

        let change = UpdateProduct {
            price: Some(3.0),
            ..Default::default()
        };
        let items = [ok, missing, broken]
            .into_iter()
            .map(|id| BulkUpdateItem {
                id,
                changes: change.clone(),
            })
            .collect();

        let service = ProductService::new(repo);
        let report = service.bulk_update(items).await;

        assert_eq!(report.requested, 3);
        assert_eq!(report.updated, 1);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].id, missing);
        assert_eq!(report.failed[1].id, broken);
        assert_eq!(
            report.failed[1].reason,
            axum_helpers::DATABASE_FAILURE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_nothing_matched() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(0));

        let service = ProductService::new(repo);
        assert!(service.delete_product(Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_related_excludes_product_and_samples_four() {
        let id = Uuid::now_v7();
        let generic = Uuid::now_v7();
        let expected = sample_filter(&[id], GroupingKey::Generic(generic));

        let mut repo = MockProductRepository::new();
        repo.expect_sample()
            .with(eq(expected), eq(RELATED_SAMPLE_SIZE))
            .returning(|_, _| Ok(vec![]));

        let service = ProductService::new(repo);
        assert!(service.related_products(id, generic).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recommended_samples_six() {
        let mut repo = MockProductRepository::new();
        repo.expect_sample()
            .with(always(), eq(RECOMMENDED_SAMPLE_SIZE))
            .returning(|_, _| Ok(vec![stored("a", 1.0)]));

        let service = ProductService::new(repo);
        let views = service
            .recommended_products(RecommendedRequest {
                product_ids: vec![Uuid::now_v7()],
                sub_category_ids: vec![Uuid::now_v7()],
            })
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
    }
}
