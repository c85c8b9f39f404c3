//! Users Domain
//!
//! Storefront customer profiles keyed by phone number, with Argon2 password
//! hashing. The stored [`UserRecord`] carries the hash; the [`User`] profile
//! handed to callers never does.

pub mod error;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{RegisterUser, RegistrationType, User, UserRecord};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
