use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, DATABASE_FAILURE_MESSAGE};
use database::DatabaseError;
use thiserror::Error;

use crate::filter::FilterError;

/// Message of every slug conflict
pub const SLUG_TAKEN_MESSAGE: &str = "A product with this name/slug already exists";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("A product with this name/slug already exists: {0}")]
    SlugTaken(String),

    #[error("Duplicate slug '{0}' in import batch")]
    DuplicateInBatch(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] FilterError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No product matches id {0}")]
    NotFound(uuid::Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Text safe to show a client; driver details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            ProductError::SlugTaken(_) => SLUG_TAKEN_MESSAGE.to_string(),
            ProductError::Database(_) => DATABASE_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::SlugTaken(_) => AppError::NotAcceptable(SLUG_TAKEN_MESSAGE.to_string()),
            ProductError::DuplicateInBatch(_) => AppError::NotAcceptable(err.to_string()),
            ProductError::InvalidQuery(e) => AppError::InvalidQuery(e.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<DatabaseError> for ProductError {
    fn from(err: DatabaseError) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for ProductError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
