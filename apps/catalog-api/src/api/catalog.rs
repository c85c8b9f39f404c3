//! Brand, category and unit-type routes; one generic router per collection

use axum::Router;
use domain_catalog::{
    Brand, CatalogEntity, CatalogService, Category, MongoCatalogRepository, UnitType, handlers,
};

use crate::state::AppState;

fn router_for<T: CatalogEntity>(state: &AppState) -> Router {
    let repository = MongoCatalogRepository::<T>::new(&state.db);
    handlers::router(CatalogService::new(repository))
}

pub fn brands(state: &AppState) -> Router {
    router_for::<Brand>(state)
}

pub fn categories(state: &AppState) -> Router {
    router_for::<Category>(state)
}

pub fn unit_types(state: &AppState) -> Router {
    router_for::<UnitType>(state)
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoCatalogRepository::<Brand>::new(&state.db)
        .init_indexes()
        .await?;
    MongoCatalogRepository::<Category>::new(&state.db)
        .init_indexes()
        .await?;
    MongoCatalogRepository::<UnitType>::new(&state.db)
        .init_indexes()
        .await?;
    Ok(())
}
