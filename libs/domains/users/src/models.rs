use chrono::{DateTime, Utc};
use database::mongodb::{serde_timestamp, serde_uuid};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// How the account was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    #[default]
    Phone,
    Email,
    Google,
    Facebook,
}

/// Storefront customer, stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", with = "serde_uuid")]
    pub id: Uuid,
    pub phone_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
    #[serde(default)]
    pub is_phone_verified: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub has_access: bool,
    #[serde(default)]
    pub registration_type: RegistrationType,
    #[serde(with = "serde_timestamp")]
    pub registration_at: DateTime<Utc>,
    #[serde(default, with = "serde_uuid::vec")]
    pub carts: Vec<Uuid>,
    #[serde(default, with = "serde_uuid::vec")]
    pub checkouts: Vec<Uuid>,
    #[serde(default, with = "serde_uuid::vec")]
    pub prescription_orders: Vec<Uuid>,
    #[serde(default, with = "serde_uuid::vec")]
    pub addresses: Vec<Uuid>,
    #[serde(default, with = "serde_uuid::vec")]
    pub wishlists: Vec<Uuid>,
    #[serde(default, with = "serde_uuid::vec")]
    pub used_coupons: Vec<Uuid>,
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Stored document: the profile plus the password hash.
///
/// Only [`User`] is ever returned to clients, so the hash cannot leak
/// through a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    /// Argon2 PHC string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        record.user
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 6, max = 20))]
    pub phone_no: String,
    /// Omitted for one-time-code sign-ups
    #[serde(default)]
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub registration_type: RegistrationType,
}

impl User {
    pub fn new(input: &RegisterUser) -> Self {
        let now = serde_timestamp::now();
        Self {
            id: Uuid::now_v7(),
            phone_no: input.phone_no.clone(),
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            username: None,
            address: None,
            district: None,
            area: None,
            shipping_address: None,
            gender: None,
            birthdate: None,
            occupation: None,
            profile_img: None,
            is_phone_verified: false,
            is_email_verified: false,
            has_access: true,
            registration_type: input.registration_type,
            registration_at: now,
            carts: Vec::new(),
            checkouts: Vec::new(),
            prescription_orders: Vec::new(),
            addresses: Vec::new(),
            wishlists: Vec::new(),
            used_coupons: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
