//! Users have no HTTP surface here; only their collection is prepared

use domain_users::MongoUserRepository;

use crate::state::AppState;

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoUserRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
