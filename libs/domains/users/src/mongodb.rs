//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::{is_duplicate_key, uuid_bson};
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::UserRecord;
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

pub struct MongoUserRepository {
    collection: Collection<UserRecord>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let phone_index = IndexModel::builder()
            .keys(doc! { "phoneNo": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_phone_no_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(phone_index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, record), fields(user_id = %record.user.id))]
    async fn create(&self, record: UserRecord) -> UserResult<()> {
        match self.collection.insert_one(&record).await {
            Ok(_) => {
                tracing::info!(user_id = %record.user.id, "User created");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicatePhone(record.user.phone_no)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<UserRecord>> {
        Ok(self.collection.find_one(doc! { "_id": uuid_bson(&id) }).await?)
    }

    #[instrument(skip(self, phone_no))]
    async fn find_by_phone(&self, phone_no: &str) -> UserResult<Option<UserRecord>> {
        Ok(self.collection.find_one(doc! { "phoneNo": phone_no }).await?)
    }

    #[instrument(skip(self, phone_no))]
    async fn exists_by_phone(&self, phone_no: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "phoneNo": phone_no })
            .await?;
        Ok(count > 0)
    }
}
