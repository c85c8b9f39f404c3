use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterUser, User, UserRecord};
use crate::password::{hash_password, verify_password};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an account; the password, when given, is stored only as a hash
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<User> {
        input.validate()?;

        if self.repository.exists_by_phone(&input.phone_no).await? {
            return Err(UserError::DuplicatePhone(input.phone_no));
        }

        let password = input.password.as_deref().map(hash_password).transpose()?;
        let user = User::new(&input);
        self.repository
            .create(UserRecord {
                user: user.clone(),
                password,
            })
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.repository.get_by_id(id).await?.map(User::from))
    }

    #[instrument(skip(self, phone_no))]
    pub async fn find_by_phone(&self, phone_no: &str) -> UserResult<Option<User>> {
        Ok(self.repository.find_by_phone(phone_no).await?.map(User::from))
    }

    /// The user when `password` matches; `None` for an unknown phone number,
    /// a wrong password, or an account without a password
    #[instrument(skip(self, phone_no, password))]
    pub async fn verify_credentials(
        &self,
        phone_no: &str,
        password: &str,
    ) -> UserResult<Option<User>> {
        let Some(record) = self.repository.find_by_phone(phone_no).await? else {
            return Ok(None);
        };
        let Some(hash) = record.password.as_deref() else {
            return Ok(None);
        };

        if verify_password(password, hash)? {
            Ok(Some(record.user))
        } else {
            tracing::info!(user_id = %record.user.id, "Password mismatch");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use serde_json::json;

    fn register(password: Option<&str>) -> RegisterUser {
        serde_json::from_value(json!({
            "phoneNo": "01700000000",
            "password": password,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_phone().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|record| {
                record
                    .password
                    .as_deref()
                    .is_some_and(|hash| hash.starts_with("$argon2") && hash != "correct horse")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(repo);
        let user = service.register(register(Some("correct horse"))).await.unwrap();
        assert_eq!(user.phone_no, "01700000000");
    }

    #[tokio::test]
    async fn test_register_duplicate_phone_never_creates() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_phone().returning(|_| Ok(true));
        repo.expect_create().never();

        let service = UserService::new(repo);
        let err = service.register(register(None)).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicatePhone(_)));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let record = UserRecord {
            user: User::new(&register(None)),
            password: Some(hash_password("correct horse").unwrap()),
        };
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_phone()
            .returning(move |_| Ok(Some(record.clone())));

        let service = UserService::new(repo);
        assert!(service
            .verify_credentials("01700000000", "correct horse")
            .await
            .unwrap()
            .is_some());
        assert!(service
            .verify_credentials("01700000000", "wrong")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_account_without_password_never_verifies() {
        let record = UserRecord {
            user: User::new(&register(None)),
            password: None,
        };
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_phone()
            .returning(move |_| Ok(Some(record.clone())));

        let service = UserService::new(repo);
        let user = service.verify_credentials("01700000000", "anything").await.unwrap();
        assert!(user.is_none());
    }
}
