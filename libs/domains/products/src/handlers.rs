//! HTTP handlers for the product API

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotAcceptableResponse,
    },
    ApiResponse, AppError, Batch, MessageResponse, Pagination, UuidPath, UuidPathPair,
    ValidatedJson,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::ProductResult;
use crate::filter::{FilterClause, FilterExpr, FilterOp};
use crate::models::{
    BatchUpdateReport, BulkUpdateItem, CreateProduct, FailedUpdate, PriceRange, PriceTier,
    ProductIds, RecommendedRequest, UpdateProduct,
};
use crate::populate::{PriceTierView, ProductView, Reference, UnitRef};
use crate::query::{ProductQuery, SearchRequest, SortDirection, SortKey};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const ADDED_MESSAGE: &str = "Product Added Successfully!";
pub const UPDATED_MESSAGE: &str = "Product Update Successfully!";
pub const BULK_UPDATED_MESSAGE: &str = "Bulk Product Update Successfully!";
pub const BULK_PARTIAL_MESSAGE: &str = "Bulk Product Update finished with failures";
pub const DELETED_MESSAGE: &str = "Product deleted Successfully!";
pub const FETCHED_MESSAGE: &str = "Product fetch Successfully!";

/// Body of `POST /product/filter`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub data: Vec<ProductView>,
    pub price_range: PriceRange,
    pub count: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        add_product,
        import_products,
        bulk_update,
        list_products,
        filter_products,
        search_products,
        price_range,
        get_by_ids,
        recommended_products,
        get_by_slug,
        get_product,
        update_product,
        delete_product,
        related_products,
    ),
    components(
        schemas(
            CreateProduct, UpdateProduct, BulkUpdateItem, BatchUpdateReport, FailedUpdate,
            PriceTier, PriceTierView, ProductView, Reference, UnitRef, PriceRange,
            ProductQuery, SearchRequest, SortKey, SortDirection, FilterExpr, FilterClause,
            FilterOp, Pagination, ProductIds, RecommendedRequest, FilterResponse, MessageResponse
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            BadRequestQueryResponse,
            NotAcceptableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(add_product))
        .route("/bulk", post(import_products).put(bulk_update))
        .route("/list", post(list_products))
        .route("/filter", post(filter_products))
        .route("/search", post(search_products))
        .route("/price-range", post(price_range))
        .route("/by-ids", post(get_by_ids))
        .route("/recommended", post(recommended_products))
        .route("/slug/{slug}", get(get_by_slug))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/related/{generic}", get(related_products))
        .with_state(shared_service)
}

/// Add a product; the SKU is assigned from the shared counter
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 200, description = "Product added", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 406, response = NotAcceptableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    service.add_product(input).await?;
    Ok(MessageResponse::new(ADDED_MESSAGE))
}

/// Replace every product with the supplied batch
#[utoipa::path(
    post,
    path = "/bulk",
    tag = "Products",
    request_body = Vec<CreateProduct>,
    responses(
        (status = 200, description = "Products imported", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 406, response = NotAcceptableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn import_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(Batch(inputs)): ValidatedJson<Batch<CreateProduct>>,
) -> ProductResult<impl IntoResponse> {
    let imported = service.import_products(inputs).await?;
    Ok(MessageResponse::new(format!(
        "{} Products imported Successfully!",
        imported
    )))
}

/// Apply partial updates one by one and report which failed.
///
/// Items are validated individually by the service, so an invalid item lands
/// in `failed` instead of rejecting the batch.
#[utoipa::path(
    put,
    path = "/bulk",
    tag = "Products",
    request_body = Vec<BulkUpdateItem>,
    responses(
        (status = 200, description = "Per-item outcome", body = ApiResponse<BatchUpdateReport>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_update<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    payload: Result<Json<Vec<BulkUpdateItem>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(items) = payload?;
    let report = service.bulk_update(items).await;
    let message = if report.failed.is_empty() {
        BULK_UPDATED_MESSAGE
    } else {
        BULK_PARTIAL_MESSAGE
    };
    Ok(ApiResponse::new(report).with_message(message))
}

/// List products matching filter clauses, sorted and paginated
#[utoipa::path(
    post,
    path = "/list",
    tag = "Products",
    request_body = ProductQuery,
    responses(
        (status = 200, description = "Page of products with total count", body = ApiResponse<Vec<ProductView>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(query): ValidatedJson<ProductQuery>,
) -> ProductResult<impl IntoResponse> {
    let page = service.list_products(query).await?;
    Ok(ApiResponse::new(page.data).with_count(page.count))
}

/// Filter products and report the price range of the whole match set
#[utoipa::path(
    post,
    path = "/filter",
    tag = "Products",
    request_body = ProductQuery,
    responses(
        (status = 200, description = "Page of products, count and price range", body = FilterResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(query): ValidatedJson<ProductQuery>,
) -> ProductResult<Json<FilterResponse>> {
    let result = service.filter_products(query).await?;
    Ok(Json(FilterResponse {
        data: result.page.data,
        price_range: result.price_range,
        count: result.page.count,
    }))
}

/// Free-text search over name and SKU
#[utoipa::path(
    post,
    path = "/search",
    tag = "Products",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching products with total count", body = ApiResponse<Vec<ProductView>>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> ProductResult<impl IntoResponse> {
    let page = service.list_products(ProductQuery::from(request)).await?;
    Ok(ApiResponse::new(page.data).with_count(page.count))
}

#[utoipa::path(
    post,
    path = "/price-range",
    tag = "Products",
    request_body = ProductQuery,
    responses(
        (status = 200, description = "Cheapest and most expensive match", body = ApiResponse<PriceRange>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn price_range<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(query): ValidatedJson<ProductQuery>,
) -> ProductResult<impl IntoResponse> {
    let range = service.price_range(query).await?;
    Ok(ApiResponse::new(range))
}

#[utoipa::path(
    post,
    path = "/by-ids",
    tag = "Products",
    request_body = ProductIds,
    responses(
        (status = 200, description = "Products with the given ids", body = ApiResponse<Vec<ProductView>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_ids<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(request): ValidatedJson<ProductIds>,
) -> ProductResult<impl IntoResponse> {
    let products = service.get_by_ids(&request.ids).await?;
    Ok(ApiResponse::new(products))
}

/// Random sample from the given sub-categories
#[utoipa::path(
    post,
    path = "/recommended",
    tag = "Products",
    request_body = RecommendedRequest,
    responses(
        (status = 200, description = "Up to six products", body = ApiResponse<Vec<ProductView>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn recommended_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(request): Json<RecommendedRequest>,
) -> ProductResult<impl IntoResponse> {
    let products = service.recommended_products(request).await?;
    Ok(ApiResponse::new(products).with_message(FETCHED_MESSAGE))
}

/// Product by slug; `data` is null when nothing matches
#[utoipa::path(
    get,
    path = "/slug/{slug}",
    tag = "Products",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product or null", body = ApiResponse<Option<ProductView>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_slug<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(slug): Path<String>,
) -> ProductResult<impl IntoResponse> {
    let product = service.get_by_slug(&slug).await?;
    Ok(ApiResponse::new(product).with_message(FETCHED_MESSAGE))
}

/// Product by id; `data` is null when nothing matches
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product or null", body = ApiResponse<Option<ProductView>>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    let product = service.get_by_id(id).await?;
    Ok(ApiResponse::new(product).with_message(FETCHED_MESSAGE))
}

/// Set only the supplied fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 406, response = NotAcceptableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(changes): ValidatedJson<UpdateProduct>,
) -> ProductResult<impl IntoResponse> {
    service.update_product(id, changes).await?;
    Ok(MessageResponse::new(UPDATED_MESSAGE))
}

/// Delete by id; succeeds even when nothing matched
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(MessageResponse::new(DELETED_MESSAGE))
}

/// Random sample of products sharing a generic
#[utoipa::path(
    get,
    path = "/{id}/related/{generic}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product to exclude"),
        ("generic" = Uuid, Path, description = "Generic to match")
    ),
    responses(
        (status = 200, description = "Up to four products", body = ApiResponse<Vec<ProductView>>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn related_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPathPair(id, generic): UuidPathPair,
) -> ProductResult<impl IntoResponse> {
    let products = service.related_products(id, generic).await?;
    Ok(ApiResponse::new(products).with_message(FETCHED_MESSAGE))
}
