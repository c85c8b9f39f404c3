//! MongoDB connector, health check and shared helpers

mod config;
mod connector;
mod health;
pub mod query;
pub mod sequence;
pub mod serde_timestamp;
pub mod serde_uuid;
mod write;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use query::{regex_fragment, token_search, tokenize, uuid_array, uuid_bson};
pub use sequence::{next_sequence, reserve_sequence};
pub use serde_timestamp::timestamp_string;
pub use write::{DUPLICATE_KEY_CODE, is_duplicate_key};

pub use ::mongodb::{Client, Collection, Database};
