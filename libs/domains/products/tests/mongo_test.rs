//! Container-backed tests for the MongoDB product repository

use domain_products::sku::SKU_SEQUENCE;
use domain_products::{
    CreateProduct, FilterExpr, MongoProductRepository, ProductError, ProductQuery,
    ProductService, SortDirection, SortKey, UpdateProduct,
};
use axum_helpers::Pagination;
use mongodb::bson::doc;
use serde_json::json;
use test_utils::{assertions::assert_sorted, TestDataBuilder, TestMongo};

fn product(name: &str, slug: &str, price: f64) -> CreateProduct {
    serde_json::from_value(json!({ "name": name, "slug": slug, "price": price })).unwrap()
}

async fn service_for(
    mongo: &TestMongo,
    test: &str,
) -> (ProductService<MongoProductRepository>, mongodb::Database) {
    let db = mongo.database(&TestDataBuilder::from_test_name(test).database_name());
    let repository = MongoProductRepository::new(&db);
    repository.init_indexes().await.unwrap();
    (ProductService::new(repository), db)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_add_assigns_padded_skus_and_rejects_duplicate_slug() {
    let mongo = TestMongo::new().await;
    let (service, _db) = service_for(&mongo, "products_add").await;

    let first = service.add_product(product("Napa", "napa", 2.5)).await.unwrap();
    let second = service.add_product(product("Ace", "ace", 1.0)).await.unwrap();
    assert_eq!(first.sku, "0001");
    assert_eq!(second.sku, "0002");

    let err = service
        .add_product(product("Napa again", "napa", 3.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ProductError::SlugTaken(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_filter_pages_sorts_and_reports_price_range() {
    let mongo = TestMongo::new().await;
    let (service, _db) = service_for(&mongo, "products_filter").await;

    for (i, price) in [5.0, 1.0, 9.0, 3.0].into_iter().enumerate() {
        let mut input = product(&format!("Item {i}"), &format!("item-{i}"), price);
        input.category_slug = Some("medicine".into());
        service.add_product(input).await.unwrap();
    }
    service
        .add_product(product("Other", "other", 100.0))
        .await
        .unwrap();

    let query = ProductQuery {
        query: vec![FilterExpr::eq("categorySlug", json!("medicine"))],
        sort: vec![SortKey {
            field: "price".into(),
            direction: SortDirection::Asc,
        }],
        paginate: Some(Pagination::new(2, 1)),
        ..Default::default()
    };
    let result = service.filter_products(query).await.unwrap();

    assert_eq!(result.page.count, 4);
    assert_eq!(result.price_range.min_price, 1.0);
    assert_eq!(result.price_range.max_price, 9.0);
    let prices: Vec<f64> = result.page.data.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![1.0, 3.0]);
    assert_sorted(&prices, "first page by price");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_matches_name_tokens_case_insensitively() {
    let mongo = TestMongo::new().await;
    let (service, _db) = service_for(&mongo, "products_search").await;

    service
        .add_product(product("Napa Extra 500mg", "napa-extra", 2.0))
        .await
        .unwrap();
    service
        .add_product(product("Ace Plus", "ace-plus", 1.0))
        .await
        .unwrap();

    let page = service
        .list_products(ProductQuery::search("napa, EXTRA"))
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].slug, "napa-extra");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_tokens_match_through_name_or_sku() {
    let mongo = TestMongo::new().await;
    let (service, db) = service_for(&mongo, "products_search_sku").await;

    let by_name = service
        .add_product(product("Paracetamol 500mg", "paracetamol-500", 1.5))
        .await
        .unwrap();
    service
        .add_product(product("Napa Extra", "napa-extra", 2.0))
        .await
        .unwrap();
    service
        .add_product(product("Paracetamol Drops", "paracetamol-drops", 3.0))
        .await
        .unwrap();

    // Next SKU handed out is 0500.
    database::mongodb::reserve_sequence(&db, SKU_SEQUENCE, 496)
        .await
        .unwrap();
    let by_sku = service
        .add_product(product("Paracetamol Syrup", "paracetamol-syrup", 4.0))
        .await
        .unwrap();
    assert_eq!(by_name.sku, "0001");
    assert_eq!(by_sku.sku, "0500");

    let page = service
        .list_products(ProductQuery::search("para 500"))
        .await
        .unwrap();

    let mut slugs: Vec<&str> = page.data.iter().map(|p| p.slug.as_str()).collect();
    slugs.sort_unstable();
    assert_eq!(slugs, vec!["paracetamol-500", "paracetamol-syrup"]);
    assert_eq!(page.count, page.data.len() as u64);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_get_populates_brand_reference() {
    let mongo = TestMongo::new().await;
    let (service, db) = service_for(&mongo, "products_populate").await;
    let builder = TestDataBuilder::from_test_name("products_populate");

    let brand_id = builder.id(1);
    db.collection::<mongodb::bson::Document>("brands")
        .insert_one(doc! { "_id": brand_id.to_string(), "name": "Beximco", "slug": "beximco" })
        .await
        .unwrap();

    let mut input = product("Napa", "napa", 2.0);
    input.brand = Some(brand_id);
    let created = service.add_product(input).await.unwrap();

    let view = service.get_by_id(created.id).await.unwrap().unwrap();
    let brand = view.brand.unwrap();
    assert_eq!(brand.id, brand_id);
    assert_eq!(brand.name, "Beximco");
    assert!(view.category.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete() {
    let mongo = TestMongo::new().await;
    let (service, _db) = service_for(&mongo, "products_update").await;

    let created = service.add_product(product("Napa", "napa", 2.0)).await.unwrap();
    let changes = UpdateProduct {
        price: Some(4.0),
        ..Default::default()
    };
    assert!(service.update_product(created.id, changes).await.unwrap());

    let view = service.get_by_slug("napa").await.unwrap().unwrap();
    assert_eq!(view.price, 4.0);
    assert!(view.updated_at >= view.created_at);

    service.delete_product(created.id).await.unwrap();
    assert!(service.get_by_id(created.id).await.unwrap().is_none());
    // deleting again is not an error
    service.delete_product(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_import_replaces_existing_products() {
    let mongo = TestMongo::new().await;
    let (service, _db) = service_for(&mongo, "products_import").await;

    service.add_product(product("Old", "old", 1.0)).await.unwrap();
    let imported = service
        .import_products(vec![product("A", "a", 1.0), product("B", "b", 2.0)])
        .await
        .unwrap();
    assert_eq!(imported, 2);

    let page = service.list_products(ProductQuery::default()).await.unwrap();
    assert_eq!(page.count, 2);
    assert!(service.get_by_slug("old").await.unwrap().is_none());
}
