//! API routes, nested under `/api` by `axum_helpers::create_router`

pub mod catalog;
pub mod health;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/product", products::router(state))
        .nest("/brand", catalog::brands(state))
        .nest("/category", catalog::categories(state))
        .nest("/unit-type", catalog::unit_types(state))
        .merge(health::router(state.clone()))
}

/// Create every collection's indexes; run once at startup
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    catalog::init_indexes(state).await?;
    users::init_indexes(state).await?;
    Ok(())
}
