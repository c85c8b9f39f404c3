//! HTTP handlers shared by the brand, category and unit-type APIs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_helpers::{ApiResponse, Batch, MessageResponse, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    Brand, CatalogEntity, CatalogSearch, Category, CreateBrand, CreateCategory, CreateUnitType,
    UnitType, UpdateBrand, UpdateCategory, UpdateUnitType,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// Catalog request and response schemas.
///
/// The three entity routers share one generic handler set, so operations are
/// not listed per entity; the route shape is documented on [`router`].
#[derive(OpenApi)]
#[openapi(
    components(schemas(
        Brand, CreateBrand, UpdateBrand,
        Category, CreateCategory, UpdateCategory,
        UnitType, CreateUnitType, UpdateUnitType,
        CatalogSearch
    )),
    tags(
        (name = "Catalog", description = "Brands, categories and unit types")
    )
)]
pub struct ApiDoc;

type SharedService<T, R> = State<Arc<CatalogService<T, R>>>;

/// Routes for one catalog entity:
///
/// | Method | Path | |
/// |---|---|---|
/// | POST | `/` | add |
/// | POST | `/bulk` | replace all |
/// | GET | `/` | list all with count |
/// | POST | `/search` | token search |
/// | GET | `/slug/{slug}` | get by slug |
/// | GET, PUT, DELETE | `/{id}` | get, partial update, delete |
pub fn router<T, R>(service: CatalogService<T, R>) -> Router
where
    T: CatalogEntity,
    R: CatalogRepository<T> + 'static,
{
    Router::new()
        .route("/", post(add::<T, R>).get(list::<T, R>))
        .route("/bulk", post(import::<T, R>))
        .route("/search", post(search::<T, R>))
        .route("/slug/{slug}", get(get_by_slug::<T, R>))
        .route(
            "/{id}",
            get(get_by_id::<T, R>)
                .put(update::<T, R>)
                .delete(delete::<T, R>),
        )
        .with_state(Arc::new(service))
}

fn fetched<T: CatalogEntity>() -> String {
    format!("{} fetch Successfully!", T::LABEL)
}

async fn add<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    ValidatedJson(input): ValidatedJson<T::Create>,
) -> CatalogResult<impl IntoResponse> {
    service.add(input).await?;
    Ok(MessageResponse::new(format!("{} Added Successfully!", T::LABEL)))
}

async fn import<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    ValidatedJson(Batch(inputs)): ValidatedJson<Batch<T::Create>>,
) -> CatalogResult<impl IntoResponse> {
    let imported = service.import(inputs).await?;
    Ok(MessageResponse::new(format!(
        "{} {} imported Successfully!",
        imported,
        T::LABEL
    )))
}

async fn list<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
) -> CatalogResult<impl IntoResponse> {
    let (data, count) = service.list().await?;
    Ok(ApiResponse::new(data).with_count(count))
}

async fn search<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    ValidatedJson(request): ValidatedJson<CatalogSearch>,
) -> CatalogResult<impl IntoResponse> {
    let (data, count) = service.search(request).await?;
    Ok(ApiResponse::new(data).with_count(count))
}

async fn get_by_slug<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    Path(slug): Path<String>,
) -> CatalogResult<impl IntoResponse> {
    let entity = service.get_by_slug(&slug).await?;
    Ok(ApiResponse::new(entity).with_message(fetched::<T>()))
}

async fn get_by_id<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    let entity = service.get_by_id(id).await?;
    Ok(ApiResponse::new(entity).with_message(fetched::<T>()))
}

async fn update<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    UuidPath(id): UuidPath,
    ValidatedJson(changes): ValidatedJson<T::Update>,
) -> CatalogResult<impl IntoResponse> {
    service.update(id, changes).await?;
    Ok(MessageResponse::new(format!("{} Update Successfully!", T::LABEL)))
}

async fn delete<T: CatalogEntity, R: CatalogRepository<T>>(
    State(service): SharedService<T, R>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(MessageResponse::new(format!("{} deleted Successfully!", T::LABEL)))
}
