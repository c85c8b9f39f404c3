use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::UserRecord;

/// Persistence for user records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, record: UserRecord) -> UserResult<()>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<UserRecord>>;

    async fn find_by_phone(&self, phone_no: &str) -> UserResult<Option<UserRecord>>;

    async fn exists_by_phone(&self, phone_no: &str) -> UserResult<bool>;
}
